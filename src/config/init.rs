use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::config::{get_config_path, validate_config, Config, ThemeMode};

/// Line-oriented prompts over any input/output pair.
struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Prompt with a message and return the trimmed input.
    fn prompt(&mut self, message: &str) -> Result<String> {
        write!(self.output, "{}", message).context("Failed to write prompt")?;
        self.output.flush().context("Failed to flush stdout")?;
        let mut line = String::new();
        self.input
            .read_line(&mut line)
            .context("Failed to read input")?;
        Ok(line.trim().to_string())
    }

    /// Prompt with a default value. Returns the default if input is empty.
    fn prompt_with_default(&mut self, message: &str, default: &str) -> Result<String> {
        let input = self.prompt(&format!("{} [{}]: ", message, default))?;
        if input.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(input)
        }
    }

    fn prompt_yes_no(&mut self, message: &str, default_yes: bool) -> Result<bool> {
        let hint = if default_yes { "Y/n" } else { "y/N" };
        let input = self.prompt(&format!("{} [{}]: ", message, hint))?.to_lowercase();
        if input.is_empty() {
            Ok(default_yes)
        } else {
            Ok(input == "y" || input == "yes" || input == "s" || input == "si")
        }
    }

    /// Re-prompt until the input parses and passes `check`.
    fn prompt_parsed<T>(
        &mut self,
        message: &str,
        default: T,
        check: impl Fn(&T) -> Result<(), String>,
    ) -> Result<T>
    where
        T: FromStr + ToString,
    {
        let default_str = default.to_string();
        loop {
            let raw = self.prompt_with_default(message, &default_str)?;
            match raw.parse::<T>() {
                Ok(value) => match check(&value) {
                    Ok(()) => return Ok(value),
                    Err(e) => self.say(&format!("  Invalid: {}. Try again.", e))?,
                },
                Err(_) => self.say(&format!("  Invalid: '{}' is not a valid value. Try again.", raw))?,
            }
        }
    }

    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text).context("Failed to write output")
    }
}

fn at_least_one(value: &usize) -> Result<(), String> {
    if *value >= 1 {
        Ok(())
    } else {
        Err("must be at least 1".to_string())
    }
}

fn collect_config<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> Result<Config> {
    let defaults = Config::default();
    let mut config = Config::default();

    p.say("")?;
    p.say("Input table")?;
    p.say("Use ';' for spreadsheets exported with decimal commas.")?;
    config.input.delimiter = loop {
        let d = p.prompt_with_default("Field delimiter", &defaults.input.delimiter)?;
        let mut candidate = config.input.clone();
        candidate.delimiter = d.clone();
        if candidate.delimiter_byte().is_some() {
            break d;
        }
        p.say("  Invalid: must be a single ASCII character. Try again.")?;
    };

    p.say("")?;
    p.say("Imputation estimates a missing 'Valor percibido' from the other criteria.")?;
    config.imputation.enabled = p.prompt_yes_no("Enable imputation?", true)?;
    if config.imputation.enabled
        && !p.prompt_yes_no("Use default model settings? (100 trees, seed 42)", true)?
    {
        config.imputation.trees =
            p.prompt_parsed("Number of trees", defaults.imputation.trees, at_least_one)?;
        config.imputation.min_samples_leaf = p.prompt_parsed(
            "Minimum rows per leaf",
            defaults.imputation.min_samples_leaf,
            at_least_one,
        )?;
        config.imputation.validation_ratio = p.prompt_parsed(
            "Share of labeled rows held out for validation",
            defaults.imputation.validation_ratio,
            |v: &f64| {
                if (0.0..1.0).contains(v) {
                    Ok(())
                } else {
                    Err("must be in [0, 1)".to_string())
                }
            },
        )?;
        config.imputation.seed =
            p.prompt_parsed("Random seed", defaults.imputation.seed, |_| Ok(()))?;
    }

    p.say("")?;
    config.charts.top_n =
        p.prompt_parsed("Vendors per top/bottom chart", defaults.charts.top_n, at_least_one)?;

    config.theme = loop {
        let t = p.prompt_with_default("Theme (auto, dark, light)", "auto")?;
        match t.to_lowercase().as_str() {
            "auto" => break ThemeMode::Auto,
            "dark" => break ThemeMode::Dark,
            "light" => break ThemeMode::Light,
            _ => p.say("  Invalid: choose auto, dark or light. Try again.")?,
        }
    };

    Ok(config)
}

/// Serialize and write `config` atomically, creating parent directories.
pub fn write_config(config: &Config, path: &Path) -> Result<()> {
    if let Err(errors) = validate_config(config) {
        anyhow::bail!("Refusing to write invalid config:\n  - {}", errors.join("\n  - "));
    }
    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save config to {}", path.display()))?;
    Ok(())
}

fn run_wizard<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    default_path: Option<PathBuf>,
) -> Result<Option<PathBuf>> {
    p.say("")?;
    p.say("vendor-rank configuration wizard")?;
    p.say("================================")?;

    let config = collect_config(p)?;

    let default_config_path = default_path
        .or_else(get_config_path)
        .unwrap_or_else(|| PathBuf::from("vendor-rank.yaml"));
    p.say("")?;
    let path_str = p.prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = p.prompt_yes_no(
            &format!("Config already exists at {}. Overwrite?", config_path.display()),
            false,
        )?;
        if !overwrite {
            p.say("Aborted.")?;
            return Ok(None);
        }
    }

    write_config(&config, &config_path)?;
    p.say("")?;
    p.say(&format!("Config written to {}", config_path.display()))?;
    p.say("Run `vendor-rank score <table.csv>` to get started.")?;
    Ok(Some(config_path))
}

/// Run the interactive init wizard on stdin/stdout.
///
/// `default_path` overrides the suggested location (~/.config/vendor-rank/config.yaml).
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    let stdin = std::io::stdin();
    let mut prompter = Prompter {
        input: stdin.lock(),
        output: std::io::stdout(),
    };
    run_wizard(&mut prompter, default_path)?;
    Ok(())
}
