// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::session::{AppContext, Session, avatar_url, initials};
use crate::utils::pretty_table;
use crate::validate::{register_request, validate_login};
use anyhow::{Context, Result};
use std::path::Path;

pub fn login(ctx: &mut AppContext, m: &clap::ArgMatches) -> Result<()> {
    let email = m.get_one::<String>("email").unwrap().trim();
    let password = m.get_one::<String>("password").unwrap();
    validate_login(email, password)?;

    let outcome = ctx.client()?.login(email, password).context("Login failed")?;
    let name = outcome.user.full_name.clone();
    ctx.begin(Session::from(outcome))?;
    println!("Welcome back, {}", if name.is_empty() { email } else { name.as_str() });
    Ok(())
}

/// Register, log in with the same credentials, then upload the avatar.
pub fn register(ctx: &mut AppContext, m: &clap::ArgMatches) -> Result<()> {
    let req = register_request(
        m.get_one::<String>("name").unwrap(),
        m.get_one::<String>("email").unwrap(),
        m.get_one::<String>("password").unwrap(),
    )?;
    let avatar = m.get_one::<String>("avatar").map(|s| s.trim().to_string());
    if let Some(path) = &avatar {
        if !Path::new(path).is_file() {
            anyhow::bail!("Profile image '{}' not found", path);
        }
    }

    let client = ctx.client()?;
    client.register(&req).context("Registration failed")?;
    let outcome = client
        .login(&req.email, &req.password)
        .context("Registered, but automatic login failed")?;
    let mut session = Session::from(outcome);

    if let Some(path) = avatar {
        let authed = client.with_credentials(session.credentials.clone());
        match authed.upload_profile_image(Path::new(&path)) {
            Ok(Some(url)) => session.user.profile_image_url = Some(url),
            Ok(None) => {}
            Err(e) => eprintln!("Profile image upload failed: {}", e),
        }
    }

    let name = session.user.full_name.clone();
    ctx.begin(session)?;
    println!("Account created for {}", name);
    Ok(())
}

pub fn logout(ctx: &mut AppContext) -> Result<()> {
    if ctx.session().is_none() {
        println!("Not logged in");
        return Ok(());
    }
    // The local session is cleared even if the backend call fails.
    if let Err(e) = ctx.client()?.logout() {
        tracing::warn!(error = %e, "backend logout failed");
    }
    ctx.end()?;
    println!("Logged out");
    Ok(())
}

pub fn whoami(ctx: &AppContext) -> Result<()> {
    match ctx.user() {
        Some(user) => {
            let avatar = user
                .profile_image_url
                .as_deref()
                .map(|u| avatar_url(ctx.config(), u))
                .unwrap_or_default();
            println!(
                "{}",
                pretty_table(
                    &["", "Name", "Email", "Avatar"],
                    vec![vec![
                        initials(&user.full_name),
                        user.full_name.clone(),
                        user.email.clone(),
                        avatar,
                    ]],
                )
            );
        }
        None => println!("Not logged in"),
    }
    Ok(())
}
