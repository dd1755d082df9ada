//! Configuration validation at the command line

use crate::common::RotationFixture;
use crate::swl;
use anyhow::Result;

#[test]
fn test_missing_config_prints_an_example() -> Result<()> {
    let fixture = RotationFixture::new()?;
    let missing = fixture.path().join("missing.toml");

    let result = swl!(fixture.path(), "-c", missing.to_str().unwrap()).assert_failure()?;

    assert!(result.contains_stderr("unable to read config"));
    assert!(result.contains_stderr("[[volume]]"));
    Ok(())
}

#[test]
fn test_unknown_anchor_weekday_is_rejected() -> Result<()> {
    let fixture = RotationFixture::new()?;
    let config = fixture.write_config("days = 3\nanchor = \"mondayish\"")?;

    let result = swl!(fixture.path(), "-c", config.to_str().unwrap()).assert_failure()?;

    assert!(result.contains_stderr("unknown weekday"));
    Ok(())
}

#[test]
fn test_out_of_range_keep_count_is_rejected() -> Result<()> {
    let fixture = RotationFixture::new()?;
    let config = fixture.write_config("days = 9999")?;

    let result = swl!(fixture.path(), "-c", config.to_str().unwrap()).assert_failure()?;

    assert!(result.contains_stderr("keep.days"));
    Ok(())
}

#[test]
fn test_malformed_toml_is_rejected() -> Result<()> {
    let fixture = RotationFixture::new()?;
    let config = fixture.write_raw_config("[[volume\nsource = ")?;

    let result = swl!(fixture.path(), "-c", config.to_str().unwrap()).assert_failure()?;

    assert!(result.contains_stderr("unable to parse config"));
    Ok(())
}

#[test]
fn test_config_without_volumes_is_rejected() -> Result<()> {
    let fixture = RotationFixture::new()?;
    let config = fixture.write_raw_config("")?;

    let result = swl!(fixture.path(), "-c", config.to_str().unwrap()).assert_failure()?;

    assert!(result.contains_stderr("[[volume]]"));
    Ok(())
}

#[test]
fn test_help_lists_the_rotation_flags() -> Result<()> {
    let fixture = RotationFixture::new()?;

    let result = swl!(fixture.path(), "--help").assert_success()?;

    assert!(result.contains_stdout("--dry-run"));
    assert!(result.contains_stdout("--config"));
    assert!(result.contains_stdout("--date"));
    Ok(())
}
