// Copyright 2025 VDBBench Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! VDBBench CLI entry point.

fn main() {
    if let Err(e) = vdbbench_dashboard_cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
