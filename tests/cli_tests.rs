//! Integration tests for CLI functionality

#[cfg(feature = "cli")]
mod cli_integration_tests {
    use std::fs;
    use std::path::PathBuf;

    use clap::Parser;
    use tempfile::TempDir;

    use libenigma::cli::commands::{execute, load_config, run, write_config};
    use libenigma::cli::{detect_format, Cli, ConfigFormat, DetectionMethod};

    const CATALOGUE: &str = include_str!("data/enigma.conf");
    const MESSAGE: &str = "\
* Bthin Beta III IV I AXLE (HQ) (EX) (IP) (TR) (BY)
FROM HIS SHOULDER HIAWATHA
";

    fn write_catalogue(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, CATALOGUE).unwrap();
        path
    }

    fn cli(config: PathBuf, input: Option<PathBuf>, output: Option<PathBuf>) -> Cli {
        Cli {
            config,
            input,
            output,
            verbose: false,
            format: None,
            emit_config: None,
        }
    }

    #[test]
    fn test_parse_arguments() {
        let cli = Cli::try_parse_from(["enigma", "-v", "machine.conf", "in.txt", "out.txt"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("machine.conf"));
        assert_eq!(cli.input, Some(PathBuf::from("in.txt")));
        assert_eq!(cli.output, Some(PathBuf::from("out.txt")));

        let cli = Cli::try_parse_from(["enigma", "--format", "text", "machine"]).unwrap();
        assert_eq!(cli.format, Some(ConfigFormat::Text));
        assert!(cli.input.is_none());

        assert!(Cli::try_parse_from(["enigma"]).is_err());
    }

    #[test]
    fn test_load_text_config() {
        let dir = TempDir::new().unwrap();
        let path = write_catalogue(&dir, "enigma.conf");

        let config = load_config(&path, None).unwrap();
        assert_eq!(config.num_rotors, 5);
        assert_eq!(config.pawls, 3);
        assert_eq!(config.rotors.len(), 11);
    }

    #[test]
    fn test_load_missing_config() {
        let dir = TempDir::new().unwrap();
        let err = load_config(&dir.path().join("absent.conf"), None).unwrap_err();
        assert!(format!("{:#}", err).contains("could not open"));
    }

    #[test]
    fn test_load_malformed_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.conf");
        fs::write(&path, "ABC 2 1 X Q (AB)").unwrap();

        let err = load_config(&path, None).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("broken.conf"));
        assert!(message.contains("file extension"));
    }

    #[cfg(feature = "serialization")]
    #[test]
    fn test_json_config_round_trip() {
        let dir = TempDir::new().unwrap();
        let text_path = write_catalogue(&dir, "enigma.conf");
        let config = load_config(&text_path, None).unwrap();

        let mut json = Vec::new();
        write_config(&config, ConfigFormat::Json, &mut json).unwrap();
        let json_path = dir.path().join("enigma.json");
        fs::write(&json_path, &json).unwrap();
        assert_eq!(load_config(&json_path, None).unwrap(), config);

        let bare_path = dir.path().join("machine");
        fs::write(&bare_path, &json).unwrap();
        let contents = fs::read_to_string(&bare_path).unwrap();
        let detection = detect_format(&bare_path, &contents, None);
        assert_eq!(detection.format, ConfigFormat::Json);
        assert_eq!(detection.method, DetectionMethod::Content);
        assert_eq!(load_config(&bare_path, None).unwrap(), config);
    }

    #[test]
    fn test_execute_with_files() {
        let dir = TempDir::new().unwrap();
        let config = write_catalogue(&dir, "enigma.conf");
        let input = dir.path().join("message.txt");
        let output = dir.path().join("cipher.txt");
        fs::write(&input, MESSAGE).unwrap();

        execute(cli(config, Some(input), Some(output.clone()))).unwrap();

        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "QVPQS OKOIL PUBKJ ZPISF XDW\n"
        );
    }

    #[test]
    fn test_execute_reports_missing_settings() {
        let dir = TempDir::new().unwrap();
        let config = write_catalogue(&dir, "enigma.conf");
        let input = dir.path().join("message.txt");
        fs::write(&input, "HELLO\n").unwrap();

        let output = dir.path().join("out.txt");
        let err = execute(cli(config, Some(input), Some(output))).unwrap_err();
        assert!(format!("{:#}", err).contains("settings"));
    }

    #[test]
    fn test_execute_emit_config() {
        let dir = TempDir::new().unwrap();
        let config = write_catalogue(&dir, "enigma.conf");
        let output = dir.path().join("copy.conf");

        let mut args = cli(config.clone(), None, Some(output.clone()));
        args.emit_config = Some(ConfigFormat::Text);
        execute(args).unwrap();

        assert_eq!(
            load_config(&output, None).unwrap(),
            load_config(&config, None).unwrap()
        );
    }

    #[test]
    fn test_run_verbose_matches_quiet() {
        let dir = TempDir::new().unwrap();
        let path = write_catalogue(&dir, "enigma.conf");
        let config = load_config(&path, None).unwrap();

        let mut quiet = Vec::new();
        let mut machine = config.build().unwrap();
        run(&mut machine, MESSAGE.as_bytes(), &mut quiet, false).unwrap();

        let mut verbose = Vec::new();
        let mut machine = config.build().unwrap();
        let stats = run(&mut machine, MESSAGE.as_bytes(), &mut verbose, true).unwrap();

        assert_eq!(quiet, verbose);
        assert_eq!(stats.symbols, 23);
    }
}
