// SPDX-License-Identifier: MPL-2.0
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use toastline::notifications::{driver, Action, Kind, Manager, Notification, ToastView};
use toastline::{config, Config};

struct Flags {
    config_path: Option<PathBuf>,
    burst: usize,
    run_ms: u64,
}

fn parse_flags() -> Result<Flags, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    Ok(Flags {
        config_path: args.opt_value_from_str("--config")?,
        burst: args.opt_value_from_str("--burst")?.unwrap_or(7),
        run_ms: args.opt_value_from_str("--run-ms")?.unwrap_or(8_000),
    })
}

fn load_config(path: Option<&PathBuf>) -> Config {
    let loaded = match path {
        Some(path) => config::load_from_path(path),
        None => config::load(),
    };
    loaded.unwrap_or_else(|err| {
        tracing::warn!(error = %err, "falling back to default configuration");
        Config::default()
    })
}

fn describe(view: &ToastView) -> String {
    let countdown = view
        .countdown
        .map(|c| format!(" {:>3.0}%", c * 100.0))
        .unwrap_or_default();
    format!(
        "[{}] {} {} ({:?}){}",
        view.timestamp, view.kind, view.title, view.state, countdown
    )
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let flags = match parse_flags() {
        Ok(flags) => flags,
        Err(err) => {
            eprintln!("toastline: {err}");
            eprintln!("usage: toastline [--config <path>] [--burst <n>] [--run-ms <ms>]");
            process::exit(2);
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let config = load_config(flags.config_path.as_ref());
    let tick_every = config.progress_interval();
    let mut manager = Manager::with_config(config);

    manager.subscribe(|snapshot| {
        println!("-- {} toast(s)", snapshot.len());
        for record in snapshot.iter() {
            println!("   {} {:?} {}", record.id(), record.removal_state(), record.title());
        }
    });

    let kinds = [Kind::Success, Kind::Info, Kind::Warning, Kind::Error];
    for n in 0..flags.burst {
        let kind = kinds[n % kinds.len()];
        let mut notification = Notification::new(kind, format!("{kind} #{}", n + 1));
        if kind == Kind::Error {
            notification = notification.with_action(Action::new("Retry", || Ok(())));
        }
        manager.push(notification);
    }

    let manager = driver::shared(manager);
    let ticker = driver::spawn(&manager, tick_every);
    tokio::time::sleep(Duration::from_millis(flags.run_ms)).await;
    ticker.abort();

    let manager = manager.lock().await;
    println!("== remaining after {}ms", flags.run_ms);
    for view in manager.views() {
        println!("   {}", describe(&view));
    }
}
