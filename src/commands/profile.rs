// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::session::AppContext;
use crate::validate::validate_password_change;
use anyhow::{Context, Result};
use std::path::Path;

pub fn handle(ctx: &mut AppContext, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => super::auth::whoami(ctx)?,
        Some(("set", sub)) => set(ctx, sub)?,
        Some(("password", sub)) => password(ctx, sub)?,
        Some(("avatar", sub)) => avatar(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(ctx: &mut AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").map(String::as_str);
    let email = sub.get_one::<String>("email").map(String::as_str);
    let avatar = if sub.get_flag("clear-avatar") {
        Some(None)
    } else {
        sub.get_one::<String>("avatar-url").map(|u| Some(u.trim().to_string()))
    };
    let user = ctx.update_profile(name, email, avatar)?;
    println!("Profile updated: {} <{}>", user.full_name, user.email);
    Ok(())
}

fn password(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let current = sub.get_one::<String>("current").unwrap();
    let new = sub.get_one::<String>("new").unwrap();
    let confirm = sub.get_one::<String>("confirm").unwrap();
    validate_password_change(current, new, confirm)?;

    ctx.authed_client()?
        .change_password(current, new)
        .context("Failed to change password")?;
    println!("Password changed successfully!");
    Ok(())
}

fn avatar(ctx: &mut AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim().to_string();
    if !Path::new(&path).is_file() {
        anyhow::bail!("Profile image '{}' not found", path);
    }
    let url = ctx
        .authed_client()?
        .upload_profile_image(Path::new(&path))
        .context("Failed to upload profile image")?;
    match url {
        Some(url) => {
            ctx.update_profile(None, None, Some(Some(url.clone())))?;
            println!("Profile image updated: {}", url);
        }
        None => println!("Profile image uploaded"),
    }
    Ok(())
}
