//! Info command - print environment diagnostics.

use anyhow::Result;

use cwp_core::{collect_environment_info, print_environment_info};

pub const PACKAGE_NAME: &str = "create-webiny-project";

pub fn execute(json: bool) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");

    if json {
        let info = collect_environment_info(PACKAGE_NAME, version);
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        print_environment_info(PACKAGE_NAME, version);
    }

    Ok(())
}
