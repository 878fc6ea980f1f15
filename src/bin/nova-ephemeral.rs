// Copyright 2024 Dmitry Tantsur <dtantsur@protonmail.com>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs::OpenOptions;
use std::process::ExitCode;

use clap::Parser;
use log::{debug, error, info};

use nova_ephemeral::config::Cli;
use nova_ephemeral::provision::provision;

fn init_logging(cli: &Cli) -> std::io::Result<()> {
    let default_level = if cli.verbose { "debug" } else { "info" };
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().filter_or("NOVA_EPHEMERAL_LOG", default_level),
    );
    if let Some(ref path) = cli.log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let _ = builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

async fn run(cli: &Cli) -> bool {
    let storage_types = cli.storage_types();
    if storage_types.is_empty() {
        error!("Nothing to do, use --ephemeral and/or --persistent");
        return false;
    }

    let cloud = match cli.connect().await {
        Ok(cloud) => cloud,
        Err(err) => {
            error!("Cannot connect to the cloud: {}", err);
            return false;
        }
    };

    let mut success = true;
    for storage_type in storage_types {
        match provision(&cloud, &cli.request(storage_type)).await {
            Ok(report) => {
                debug!("Report for {} storage: {:?}", storage_type, report);
                info!(
                    "Configured {} storage: {} host(s) added, {} flavor(s) created, {} flavor(s) tagged",
                    storage_type,
                    report.added_hosts.len(),
                    report.created_flavors.len(),
                    report.tagged_flavors.len()
                );
            }
            Err(err) => {
                error!("Failed to configure {} storage: {}", storage_type, err);
                success = false;
            }
        }
    }
    success
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_logging(&cli) {
        eprintln!("Cannot open the log file: {}", err);
        return ExitCode::FAILURE;
    }
    if cli.verbose {
        info!("Effective configuration: {:?}", cli);
    }

    if run(&cli).await {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
