use anyhow::Result;
use roster_store::Directory;
use serde::Serialize;
use std::io::{self, Write};

pub mod users;

pub struct Context<'a> {
    pub directory: &'a mut Directory,
    pub json: bool,
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
