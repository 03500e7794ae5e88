//! Interactive session: one login, many page commands.

use crate::commands::{self, PageCommand};
use crate::render;
use clap::{Parser, Subcommand};
use healthrecs_core::auth::{role_switch_options, Role};
use healthrecs_core::context::AppContext;
use healthrecs_core::error::ApiAction;
use healthrecs_core::notice::Notice;
use healthrecs_core::pages::failure_notice;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand, Debug)]
enum ShellCommand {
    /// Sign in with a demo account
    Login { username: String, password: String },
    /// Sign out
    Logout,
    /// Change the current user's role
    SwitchRole { role: Role },
    /// List the roles you can switch to
    Roles,
    /// Leave the shell
    #[command(alias = "quit")]
    Exit,
    #[command(flatten)]
    Page(PageCommand),
}

/// Split a line into words, honouring single and double quotes.
fn split_words(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if let Some(q) = quote {
        return Err(format!("unterminated {q} quote"));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

fn login_required() -> Notice {
    Notice::warning("Log in first.").with_description("Use: login <username> <password>")
}

pub async fn run(ctx: &mut AppContext) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    println!("HealthRecs shell. Type 'help' for commands, 'exit' to leave.");

    loop {
        let prompt = match ctx.session().current_user() {
            Some(user) => format!("{}@healthrecs> ", user.username),
            None => "healthrecs> ".to_string(),
        };
        stdout.write_all(prompt.as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let words = match split_words(&line) {
            Ok(words) if words.is_empty() => continue,
            Ok(words) => words,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };
        let parsed = match ShellLine::try_parse_from(words) {
            Ok(parsed) => parsed,
            Err(e) => {
                let _ = e.print();
                continue;
            }
        };

        let palette = commands::palette(ctx);
        match parsed.command {
            ShellCommand::Login { username, password } => {
                match ctx.session_mut().login(&username, &password).await {
                    Ok(notice) => println!("{}", render::notice(palette, &notice)),
                    Err(e) => eprintln!(
                        "{}",
                        render::notice(palette, &failure_notice(&e, ApiAction::Load))
                    ),
                }
            }
            ShellCommand::Logout => println!("{}", render::notice(palette, &ctx.logout())),
            ShellCommand::SwitchRole { role } => match ctx.session_mut().switch_role(role) {
                Some(notice) => println!("{}", render::notice(palette, &notice)),
                None => eprintln!("{}", render::notice(palette, &login_required())),
            },
            ShellCommand::Roles => match ctx.session().current_user() {
                Some(user) => {
                    for role in role_switch_options(user.role) {
                        println!("  {role}");
                    }
                }
                None => eprintln!("{}", render::notice(palette, &login_required())),
            },
            ShellCommand::Exit => break,
            ShellCommand::Page(command) => {
                commands::run(ctx, command).await;
            }
        }
    }

    ctx.logout();
    Ok(())
}
