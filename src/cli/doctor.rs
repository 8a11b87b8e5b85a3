//! Environment diagnostics
//!
//! Checks everything a publish run needs before any article is involved:
//! credentials, the automation driver sidecar, and the results directory.

use crosspub_automation::{RemoteConfig, RemoteSession};

const REQUIRED_ENV: &[&str] = &[
    "DINGTALK_APP_KEY",
    "DINGTALK_APP_SECRET",
    "DINGTALK_USER_ID",
    "WECHAT_APP_ID",
    "WECHAT_APP_SECRET",
];

/// Run all diagnostics
pub async fn run() -> anyhow::Result<()> {
    println!("crosspub doctor\n");

    let mut all_ok = true;
    all_ok &= check_credentials();
    all_ok &= check_driver().await;
    all_ok &= check_results_dir();

    println!();
    if all_ok {
        println!("All checks passed.");
        Ok(())
    } else {
        println!("Some checks failed. Fix the issues above before publishing.");
        std::process::exit(1);
    }
}

fn check_credentials() -> bool {
    let mut ok = true;
    for name in REQUIRED_ENV {
        let set = std::env::var(name)
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false);
        if set {
            println!("  [ok]     {name}");
        } else {
            println!("  [MISSING] {name}");
            ok = false;
        }
    }
    ok
}

async fn check_driver() -> bool {
    let config = RemoteConfig::from_env();
    let base_url = config.base_url.clone();
    match RemoteSession::connect(config).await {
        Ok(_) => {
            println!("  [ok]     automation driver at {base_url}");
            true
        }
        Err(err) => {
            println!("  [DOWN]   automation driver at {base_url}: {err}");
            false
        }
    }
}

fn check_results_dir() -> bool {
    let dir = std::env::var("CROSSPUB_RESULTS_DIR").unwrap_or_else(|_| "results".to_string());
    match std::fs::create_dir_all(&dir) {
        Ok(()) => {
            let probe = std::path::Path::new(&dir).join(".doctor-probe");
            match std::fs::write(&probe, b"ok") {
                Ok(()) => {
                    let _ = std::fs::remove_file(&probe);
                    println!("  [ok]     results dir {dir} is writable");
                    true
                }
                Err(err) => {
                    println!("  [ERROR]  results dir {dir} not writable: {err}");
                    false
                }
            }
        }
        Err(err) => {
            println!("  [ERROR]  cannot create results dir {dir}: {err}");
            false
        }
    }
}
