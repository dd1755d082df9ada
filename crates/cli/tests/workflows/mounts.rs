//! Mount point preparation around a run
//!
//! The real `mount`/`umount` need root and /etc/fstab entries, so these
//! tests put fake tools on the child's PATH and read back the invocation
//! log they write.

use crate::common::RotationFixture;
use crate::swl;
use anyhow::Result;
use std::env;
use std::fs;
use std::path::Path;

/// Drop fake `mount`/`umount` executables into `dir`, each appending its
/// invocation to `log`. `mount` fails for paths containing `fail_on`.
fn install_fake_tools(dir: &Path, log: &Path, fail_on: Option<&str>) -> Result<()> {
    fs::create_dir_all(dir)?;
    let failure = match fail_on {
        Some(pattern) => format!(
            "case \"$1\" in\n  *{}*) echo \"mount: can't find $1 in /etc/fstab.\" >&2; exit 32 ;;\nesac\n",
            pattern
        ),
        None => String::new(),
    };
    write_tool(
        &dir.join("mount"),
        &format!(
            "#!/bin/sh\necho \"mount $1\" >> \"{}\"\n{}exit 0\n",
            log.display(),
            failure
        ),
    )?;
    write_tool(
        &dir.join("umount"),
        &format!(
            "#!/bin/sh\necho \"umount $1\" >> \"{}\"\nexit 0\n",
            log.display()
        ),
    )?;
    Ok(())
}

fn write_tool(path: &Path, script: &str) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::write(path, script)?;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    Ok(())
}

/// PATH value resolving to the fake tools first.
fn tool_path(dir: &Path) -> String {
    format!("{}:{}", dir.display(), env::var("PATH").unwrap_or_default())
}

#[test]
fn test_mount_points_are_mounted_then_unmounted_around_a_run() -> Result<()> {
    let fixture = RotationFixture::new()?;
    let tools = fixture.path().join("tools");
    let log = fixture.path().join("tools.log");
    install_fake_tools(&tools, &log, None)?;

    let first = fixture.path().join("pool");
    let second = fixture.path().join("pool-mirror");
    let config =
        fixture.write_config_with_mounts("days = 3", &[first.as_path(), second.as_path()])?;

    let result = swl!(
        fixture.path(),
        "-c",
        config.to_str().unwrap(),
        "--date",
        "2024-06-10",
        "--dry-run",
        "--no-color"
    )
    .env("PATH", &tool_path(&tools))
    .assert_success()?;

    assert!(result.contains_stdout(&format!("Mounted {}", first.display())));
    assert!(result.contains_stdout(&format!("Mounted {}", second.display())));
    assert!(result.contains_stdout(&format!("Un-mounted {}", first.display())));
    assert!(result.contains_stdout(&format!("Un-mounted {}", second.display())));
    assert!(result.contains_stdout("Complete!"));

    let invocations: Vec<String> = fs::read_to_string(&log)?
        .lines()
        .map(str::to_string)
        .collect();
    assert_eq!(
        invocations,
        vec![
            format!("mount {}", first.display()),
            format!("mount {}", second.display()),
            format!("umount {}", first.display()),
            format!("umount {}", second.display()),
        ]
    );
    Ok(())
}

#[test]
fn test_failed_mount_releases_the_points_already_mounted() -> Result<()> {
    let fixture = RotationFixture::new()?;
    let tools = fixture.path().join("tools");
    let log = fixture.path().join("tools.log");
    install_fake_tools(&tools, &log, Some("dead-pool"))?;

    let good = fixture.path().join("pool");
    let bad = fixture.path().join("dead-pool");
    let config = fixture.write_config_with_mounts("days = 3", &[good.as_path(), bad.as_path()])?;

    let result = swl!(
        fixture.path(),
        "-c",
        config.to_str().unwrap(),
        "--date",
        "2024-06-10",
        "--dry-run",
        "--no-color"
    )
    .env("PATH", &tool_path(&tools))
    .execute()?;

    // The volume is skipped, and the run ends non-zero.
    assert_eq!(result.exit_code, 1);
    assert!(result.contains_stdout(&format!("ERROR: Unable to mount {}", bad.display())));
    assert!(result.contains_stdout("-- Skipping this volume."));
    assert!(!result.contains_stdout("Subvolume to snapshot:"));

    // The point mounted before the failure was released again.
    assert!(result.contains_stdout(&format!("Mounted {}", good.display())));
    assert!(result.contains_stdout(&format!("Un-mounted {}", good.display())));
    let invocations: Vec<String> = fs::read_to_string(&log)?
        .lines()
        .map(str::to_string)
        .collect();
    assert_eq!(
        invocations,
        vec![
            format!("mount {}", good.display()),
            format!("mount {}", bad.display()),
            format!("umount {}", good.display()),
        ]
    );
    Ok(())
}
