//! Drive the two binaries end to end against a fake `ledger` and a local chart endpoint.

use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::Path;
use std::process::Command;
use std::thread;

const AAPL_CHART: &str = r#"{"chart":{"result":[{"meta":{"symbol":"AAPL","exchangeTimezoneName":"America/New_York"},"timestamp":[1709303400],"indicators":{"quote":[{"close":[150.25]}]}}],"error":null}}"#;
const TD_CHART: &str = r#"{"chart":{"result":[{"meta":{"symbol":"TD.TO","exchangeTimezoneName":"America/Toronto"},"timestamp":[1709303400],"indicators":{"quote":[{"close":[85.31999969482422]}]}}],"error":null}}"#;

/// Answer `requests` chart requests, picking the body by ticker in the path.
fn spawn_chart_server(requests: usize) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        for stream in listener.incoming().take(requests) {
            let mut stream = stream.unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            loop {
                let mut header = String::new();
                reader.read_line(&mut header).unwrap();
                if header == "\r\n" || header.is_empty() {
                    break;
                }
            }
            let body = if request_line.contains("/chart/TD.TO") { TD_CHART } else { AAPL_CHART };
            write!(
                stream,
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                body.len(),
                body
            )
            .unwrap();
        }
    });
    format!("http://{addr}")
}

fn write_config(dir: &Path, body: &str) -> std::path::PathBuf {
    let p = dir.join("config.toml");
    fs::write(&p, body).unwrap();
    p
}

#[test]
fn test_ledger_prices_appends_once() {
    let dir = tempfile::tempdir().unwrap();
    let prices = dir.path().join("prices.db");
    fs::write(&prices, "P 2024/02/29 TD $84.00\n").unwrap();

    let base = spawn_chart_server(4);
    let config = write_config(
        dir.path(),
        &format!(
            r#"
[market]
base_url = "{base}"
timeout_secs = 5

[[symbols]]
ticker = "AAPL"
ledger_name = "AAPL"
foreign_currency = true

[[symbols]]
ticker = "TD.TO"
ledger_name = "TD"
"#
        ),
    );

    let run = || {
        Command::new(env!("CARGO_BIN_EXE_ledger-prices"))
            .arg("--config")
            .arg(&config)
            .arg("--prices")
            .arg(&prices)
            .env("RUST_LOG", "warn")
            .output()
            .unwrap()
    };

    let first = run();
    assert!(first.status.success(), "{}", String::from_utf8_lossy(&first.stderr));
    let expected = "P 2024/02/29 TD $84.00\n\nP 2024-03-01 AAPL 150.25 $USD\nP 2024/03/01 TD $85.32\n";
    assert_eq!(fs::read_to_string(&prices).unwrap(), expected);
    assert!(String::from_utf8_lossy(&first.stdout).starts_with("2 new, 0 already recorded"));

    let second = run();
    assert!(second.status.success(), "{}", String::from_utf8_lossy(&second.stderr));
    assert_eq!(fs::read_to_string(&prices).unwrap(), expected);
    assert!(String::from_utf8_lossy(&second.stdout).starts_with("0 new, 2 already recorded"));
}

#[test]
fn test_ledger_prices_aborts_on_unreachable_provider() {
    let dir = tempfile::tempdir().unwrap();
    let prices = dir.path().join("prices.db");

    let closed = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
    let config = write_config(
        dir.path(),
        &format!("[market]\nbase_url = \"http://{closed}\"\ntimeout_secs = 5\n"),
    );

    let out = Command::new(env!("CARGO_BIN_EXE_ledger-prices"))
        .arg("--config")
        .arg(&config)
        .arg("--prices")
        .arg(&prices)
        .output()
        .unwrap();

    assert!(!out.status.success());
    assert!(!prices.exists());
    assert!(String::from_utf8_lossy(&out.stderr).contains("aborting price run"));
}

#[cfg(unix)]
#[test]
fn test_ledger_graphs_fiscal_print() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let calls = dir.path().join("calls.log");
    let script = dir.path().join("fake-ledger");
    fs::write(
        &script,
        format!(
            "#!/bin/sh\necho \"$@\" >> '{}'\nprintf '           $10.00  Income\\n'\n",
            calls.display()
        ),
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    let ledger = dir.path().join("ledger.dat");
    fs::write(&ledger, "").unwrap();
    let config = write_config(
        dir.path(),
        &format!("[ledger]\ncommand = \"{}\"\n", script.display()),
    );

    let out = Command::new(env!("CARGO_BIN_EXE_ledger-graphs"))
        .args(["-fiscal", "2023", "--print", "--ledger"])
        .arg(&ledger)
        .arg("--config")
        .arg(&config)
        .output()
        .unwrap();

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Jan 2023"), "{stdout}");
    assert!(stdout.contains("Dec 2023"), "{stdout}");
    assert!(stdout.trim_end().ends_with("Net: $120"), "{stdout}");

    let log = fs::read_to_string(&calls).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 12);
    assert!(lines[0].contains("-b 2023/12/01 -e 2024/01/01 balance Income Expenses --invert"));
    assert!(lines[11].contains("-b 2023/01/01 -e 2023/02/01"));
}

#[test]
fn test_ledger_graphs_missing_ledger_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = Command::new(env!("CARGO_BIN_EXE_ledger-graphs"))
        .arg("--print")
        .arg("--ledger")
        .arg(dir.path().join("missing.dat"))
        .env("HOME", dir.path())
        .output()
        .unwrap();

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("ledger file not found"));
}
