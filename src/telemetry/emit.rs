use anyhow::Result;
use serde::Serialize;
use std::io::{self, Write};

use crate::output::types::{Envelope, Meta};

// Envelopes only go to stdout when --json is set; logs stay on stderr.
pub fn print_plan<T: Serialize>(op: &'static str, plan: &T, meta: Option<Meta>) -> Result<()> {
    if !super::config::json_mode() { return Ok(()); }
    let env = Envelope::plan(op, plan, meta)?;
    write_envelope(&env)
}

pub fn print_result<T: Serialize>(op: &'static str, result: &T, meta: Option<Meta>) -> Result<()> {
    if !super::config::json_mode() { return Ok(()); }
    let env = Envelope::result(op, result, meta)?;
    write_envelope(&env)
}

fn write_envelope(env: &Envelope) -> Result<()> {
    let mut out = io::stdout();
    serde_json::to_writer(&mut out, env)?;
    writeln!(&mut out)?;
    out.flush()?;
    Ok(())
}
