use std::env;
use std::io::{self, BufRead, Write};

use anyhow::{anyhow, bail, Context, Result};
use formbot::{
    chat::{PhotoVariant, Prompt, PromptSink, UserReply},
    logging::init_logging,
    ChatSession, UserId,
};

fn main() -> Result<()> {
    init_logging();
    let args = CliArgs::parse()?;
    let mut session = ChatSession::new()?;
    tracing::info!(
        user_id = %args.user_id,
        table = %session.store().path().display(),
        "console transport ready"
    );
    println!("Type /start to begin, /photo <ref> [WxH ...] to send a photo, /quit to exit.");

    let mut sink = StdoutSink;
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("Failed reading from stdin")?;
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("/quit") {
            break;
        }
        let reply = match parse_photo(trimmed) {
            Some(Ok(variants)) => UserReply::photo(args.user_id.clone(), variants),
            Some(Err(err)) => {
                println!("{err:#}");
                continue;
            }
            None => UserReply::text(args.user_id.clone(), line.clone()),
        };
        session.handle(&reply, &mut sink)?;
    }
    Ok(())
}

struct StdoutSink;

impl PromptSink for StdoutSink {
    fn emit(&mut self, prompt: Prompt) -> Result<()> {
        let mut out = io::stdout().lock();
        if let Some(image) = &prompt.image {
            writeln!(out, "[photo {}]", image.photo_ref)?;
            writeln!(out, "{}", image.caption)?;
        }
        if !prompt.text.is_empty() {
            writeln!(out, "{}", prompt.text)?;
        }
        if !prompt.quick_replies.is_empty() {
            writeln!(out, "  options: {}", prompt.quick_replies.join(" | "))?;
        }
        out.flush()?;
        Ok(())
    }
}

/// `/photo <ref> [WxH ...]`: one variant per size, all sharing the ref with a
/// size suffix. Without sizes a single 1x1 variant is sent.
fn parse_photo(line: &str) -> Option<Result<Vec<PhotoVariant>>> {
    let rest = line.strip_prefix("/photo")?;
    let mut parts = rest.split_whitespace();
    let Some(photo_ref) = parts.next() else {
        return Some(Err(anyhow!("Usage: /photo <ref> [WxH ...]")));
    };
    let sizes: Vec<&str> = parts.collect();
    if sizes.is_empty() {
        return Some(Ok(vec![PhotoVariant::new(photo_ref, 1, 1)]));
    }
    Some(
        sizes
            .iter()
            .map(|size| {
                let (w, h) = size
                    .split_once('x')
                    .ok_or_else(|| anyhow!("Invalid size '{size}', expected WxH"))?;
                let width = w.parse().with_context(|| format!("Invalid width in '{size}'"))?;
                let height = h.parse().with_context(|| format!("Invalid height in '{size}'"))?;
                Ok(PhotoVariant::new(format!("{photo_ref}@{size}"), width, height))
            })
            .collect(),
    )
}

struct CliArgs {
    user_id: UserId,
}

impl CliArgs {
    fn parse() -> Result<Self> {
        let mut args = env::args().skip(1);
        let mut user_id = UserId::from("local");
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--user" => {
                    let value = args.next().context("Expected a user id after --user")?;
                    user_id = UserId::from(value);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                other => bail!("Unknown argument '{other}'. Run with --help for usage instructions."),
            }
        }
        Ok(Self { user_id })
    }
}

fn print_usage() {
    println!("FormBot console transport");
    println!("Runs the profile questionnaire over stdin/stdout.");
    println!("Usage: cargo run --bin formbot-console -- [options]");
    println!("Options:");
    println!("  --user <id>   User id to answer as (default: local)");
    println!("Environment:");
    println!("  FORMBOT_HOME  Data directory holding config/ and the profile table");
    println!("  FORMBOT_LOG   Log filter (default: info)");
}
