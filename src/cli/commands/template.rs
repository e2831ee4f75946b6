//! Implementation of the `aicontent template` command.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::services::ConfigAccessors;

#[derive(Args, Debug)]
pub struct TemplateArgs {
    /// Template group
    pub group: String,

    /// Template name within the group
    pub template: String,
}

#[derive(Debug, Serialize)]
pub struct TemplateOutput {
    pub group: String,
    pub template: String,
    pub body: String,
}

impl CommandOutput for TemplateOutput {
    fn to_human(&self) -> String {
        self.body.clone()
    }
}

pub fn execute(args: TemplateArgs, accessors: &ConfigAccessors, json_mode: bool) -> Result<()> {
    let body = accessors.prompt_template(&args.group, &args.template)?;
    output(
        &TemplateOutput {
            group: args.group,
            template: args.template,
            body,
        },
        json_mode,
    );
    Ok(())
}
