use crate::commands::{print_json, Context};
use crate::error::not_found;
use crate::util::{format_user_line, parse_user_id};
use anyhow::Result;
use clap::Args;
use roster_core::domain::{looks_like_email, User};
use roster_store::UserNew;
use tracing::warn;

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub id: String,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    pub query: String,
}

pub fn add_user(ctx: &mut Context<'_>, args: AddArgs) -> Result<()> {
    let user = ctx.directory.create(UserNew {
        name: args.name,
        email: args.email,
    })?;

    if !looks_like_email(&user.email) {
        warn!(email = %user.email, "stored email does not look like an address");
    }

    if ctx.json {
        print_json(&user)?;
    } else {
        println!("created {} {}", user.id, user.name);
    }
    Ok(())
}

pub fn show_user(ctx: &Context<'_>, args: ShowArgs) -> Result<()> {
    let id = parse_user_id(&args.id)?;
    let user = ctx
        .directory
        .get(id)
        .ok_or_else(|| not_found("user not found"))?;

    if ctx.json {
        print_json(user)?;
        return Ok(());
    }

    println!("id: {}", user.id);
    println!("name: {}", user.name);
    println!("email: {}", user.email);
    Ok(())
}

pub fn search_users(ctx: &Context<'_>, args: SearchArgs) -> Result<()> {
    let results = ctx.directory.search(&args.query);
    print_users(ctx, &results)
}

pub fn list_users(ctx: &Context<'_>) -> Result<()> {
    let results: Vec<&User> = ctx.directory.iter().collect();
    print_users(ctx, &results)
}

fn print_users(ctx: &Context<'_>, users: &[&User]) -> Result<()> {
    if ctx.json {
        print_json(&users)?;
        return Ok(());
    }
    for user in users {
        println!("{}", format_user_line(user));
    }
    Ok(())
}
