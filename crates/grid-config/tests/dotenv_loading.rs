//! `.env` values flow through the figment chain.

use figment::Jail;
use grid_config::GridConfig;
use pretty_assertions::assert_eq;

#[test]
fn project_dotenv_feeds_env_layer() {
    Jail::expect_with(|jail| {
        jail.create_file(".env", "SCHOOLGRID_GENERAL__DEFAULT_LIMIT=33\n")?;
        jail.create_dir(".schoolgrid")?;
        jail.create_file(
            ".schoolgrid/config.toml",
            r#"
[general]
default_limit = 50
"#,
        )?;

        let config = GridConfig::load_with_dotenv(jail.directory()).expect("config should load");
        assert_eq!(config.general.default_limit, 33);
        Ok(())
    });
}
