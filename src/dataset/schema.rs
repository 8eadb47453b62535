use super::categorical::fold;
use crate::error::{DatasetError, MissingColumn};

pub const NAME: &str = "Proveedor";
pub const PRICE: &str = "Precio";
pub const LEAD_TIME: &str = "Tiempo de entrega (días)";
pub const COMPLIANCE: &str = "Cumple normativa";
pub const FISCAL_STATUS: &str = "Estatus fiscal";
pub const BLACKLIST: &str = "En lista negra";
pub const PERCEIVED_VALUE: &str = "Valor percibido";
pub const ESTIMATED_VALUE: &str = "Valor percibido estimado";
pub const TOTAL: &str = "Score_total";

/// The six qualitative criteria rated on a 1-10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rating {
    ServiceQuality,
    Responsiveness,
    PriorExperience,
    AddedValue,
    Sustainability,
    ExternalReputation,
}

impl Rating {
    pub const ALL: [Rating; 6] = [
        Rating::ServiceQuality,
        Rating::Responsiveness,
        Rating::PriorExperience,
        Rating::AddedValue,
        Rating::Sustainability,
        Rating::ExternalReputation,
    ];

    pub const MIN: f64 = 1.0;
    pub const MAX: f64 = 10.0;

    pub fn column(self) -> &'static str {
        match self {
            Rating::ServiceQuality => "Calidad del servicio",
            Rating::Responsiveness => "Capacidad de respuesta",
            Rating::PriorExperience => "Experiencia previa",
            Rating::AddedValue => "Valor agregado",
            Rating::Sustainability => "Sostenibilidad",
            Rating::ExternalReputation => "Reputación externa",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Required headers, in the order they are reported when missing
pub fn required_columns() -> Vec<&'static str> {
    let mut columns = vec![NAME, PRICE, LEAD_TIME, COMPLIANCE, FISCAL_STATUS, BLACKLIST];
    columns.extend(Rating::ALL.iter().map(|r| r.column()));
    columns
}

/// Column positions resolved once from the header row.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub name: usize,
    pub price: usize,
    pub lead_time: usize,
    pub compliance: usize,
    pub fiscal_status: usize,
    pub blacklist: usize,
    pub ratings: [usize; 6],
    pub perceived_value: Option<usize>,
}

impl Schema {
    /// Resolve every required column or report all of the missing ones at once.
    pub fn resolve(headers: &[String]) -> Result<Self, DatasetError> {
        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(DatasetError::NoHeader);
        }

        let position = |name: &str| headers.iter().position(|h| h == name);

        let missing: Vec<MissingColumn> = required_columns()
            .into_iter()
            .filter(|name| position(name).is_none())
            .map(|name| {
                let folded = fold(name);
                let hint = headers.iter().find(|h| fold(h) == folded).cloned();
                MissingColumn { name, hint }
            })
            .collect();
        if !missing.is_empty() {
            return Err(DatasetError::MissingColumns(missing));
        }

        // Every lookup below succeeded in the check above
        let find = |name: &str| position(name).unwrap_or_default();
        let mut ratings = [0usize; 6];
        for rating in Rating::ALL {
            ratings[rating.index()] = find(rating.column());
        }

        Ok(Schema {
            name: find(NAME),
            price: find(PRICE),
            lead_time: find(LEAD_TIME),
            compliance: find(COMPLIANCE),
            fiscal_status: find(FISCAL_STATUS),
            blacklist: find(BLACKLIST),
            ratings,
            perceived_value: position(PERCEIVED_VALUE),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_headers() -> Vec<String> {
        required_columns().into_iter().map(String::from).collect()
    }

    #[test]
    fn test_resolve_full_header() {
        let schema = Schema::resolve(&full_headers()).unwrap();
        assert_eq!(schema.name, 0);
        assert_eq!(schema.price, 1);
        assert_eq!(schema.ratings[Rating::ExternalReputation.index()], 11);
        assert!(schema.perceived_value.is_none());
    }

    #[test]
    fn test_resolve_optional_label_column() {
        let mut headers = full_headers();
        headers.insert(0, PERCEIVED_VALUE.to_string());
        let schema = Schema::resolve(&headers).unwrap();
        assert_eq!(schema.perceived_value, Some(0));
        assert_eq!(schema.name, 1);
    }

    #[test]
    fn test_resolve_reports_every_missing_column() {
        let headers: Vec<String> = full_headers()
            .into_iter()
            .filter(|h| h != PRICE && h != "Sostenibilidad")
            .collect();
        match Schema::resolve(&headers) {
            Err(DatasetError::MissingColumns(missing)) => {
                let names: Vec<_> = missing.iter().map(|m| m.name).collect();
                assert_eq!(names, vec![PRICE, "Sostenibilidad"]);
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_hints_misspelled_column() {
        let headers: Vec<String> = full_headers()
            .into_iter()
            .map(|h| if h == LEAD_TIME { "tiempo de entrega (dias)".to_string() } else { h })
            .collect();
        match Schema::resolve(&headers) {
            Err(DatasetError::MissingColumns(missing)) => {
                assert_eq!(missing.len(), 1);
                assert_eq!(missing[0].hint.as_deref(), Some("tiempo de entrega (dias)"));
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_empty_header() {
        assert!(matches!(Schema::resolve(&[]), Err(DatasetError::NoHeader)));
    }
}
