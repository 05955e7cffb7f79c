use std::path::PathBuf;

#[derive(Debug)]
pub struct Args {
    pub config_path: PathBuf,
}

impl Args {
    const DEFAULT_CONFIG_PATH: &'static str = "minter-config.toml";
    const HELP_MSG: &'static str =
        "Usage: -h/--help, -c/--config <path|default minter-config.toml>";

    pub fn from_args() -> Result<Self, String> {
        let cli_args: Vec<String> = std::env::args().skip(1).collect();

        if cli_args.is_empty() {
            println!("Using default config path: {}", Self::DEFAULT_CONFIG_PATH);
            println!("{}\n", Self::HELP_MSG);
        }

        let mut config_path: Option<PathBuf> = None;
        let mut expect_path = false;

        for item in cli_args {
            if expect_path {
                let path = PathBuf::from(item);
                if !path.exists() {
                    return Err(format!("Error: File '{}' does not exist!", path.display()));
                }
                config_path = Some(path);
                expect_path = false;
                continue;
            }
            match item.as_str() {
                "-c" | "--config" => expect_path = true,
                "-h" | "--help" => return Err(Self::HELP_MSG.to_string()),
                unknown => return Err(format!("Unknown argument '{unknown}'\n{}", Self::HELP_MSG)),
            }
        }
        if expect_path {
            return Err(format!("Missing path after -c/--config\n{}", Self::HELP_MSG));
        }

        Ok(Self {
            config_path: config_path
                .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_CONFIG_PATH)),
        })
    }
}
