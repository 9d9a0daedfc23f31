// Terminal presentation layer: line commands in, snapshot text out

use crate::downloader::format_selector::QualityCatalog;
use crate::downloader::models::{Format, Phase, Snapshot};
use crate::downloader::session::Intent;
use crate::downloader::utils::format_clock;

pub const HELP: &str = "\
Commands:
  url <link>          fetch details for a YouTube link
  drop [text]         simulate dropping text onto the window
  clear               clear the input
  start <seconds>     set trim start
  end <seconds>       set trim end
  format mp3|mp4      choose output format
  quality <value>     choose quality, e.g. 192 or 4k
  download            start the download
  theme               toggle dark mode
  history             list recent downloads
  show                print the current state
  help                this text
  quit                exit";

/// A parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Intent(Intent),
    History,
    Show,
    Help,
    Quit,
}

/// Parse one input line. Blank lines are `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "url" | "fetch" => {
            if rest.is_empty() {
                return Err("usage: url <link>".to_string());
            }
            Command::Intent(Intent::SubmitUrl(rest.to_string()))
        }
        "drop" => Command::Intent(Intent::DropUrl(rest.to_string())),
        "clear" => Command::Intent(Intent::ClearInput),
        "start" => Command::Intent(Intent::EditTrimStart(parse_seconds(rest)?)),
        "end" => Command::Intent(Intent::EditTrimEnd(parse_seconds(rest)?)),
        "format" => {
            let format = Format::from_label(rest)
                .ok_or_else(|| format!("unknown format '{}', expected mp3 or mp4", rest))?;
            Command::Intent(Intent::ChangeFormat(format))
        }
        "quality" => {
            if rest.is_empty() {
                return Err("usage: quality <value>".to_string());
            }
            Command::Intent(Intent::ChangeQuality(rest.to_string()))
        }
        "download" => Command::Intent(Intent::StartDownload),
        "theme" => Command::Intent(Intent::ToggleTheme),
        "history" => Command::History,
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '{}', try `help`", other)),
    };
    Ok(Some(command))
}

/// Accepts plain seconds or `mm:ss`
fn parse_seconds(raw: &str) -> Result<u32, String> {
    let parsed = match raw.split_once(':') {
        Some((m, s)) => m
            .parse::<u32>()
            .ok()
            .zip(s.parse::<u32>().ok().filter(|s| *s < 60))
            .map(|(m, s)| m * 60 + s),
        None => raw.parse::<u32>().ok(),
    };
    parsed.ok_or_else(|| format!("expected seconds or mm:ss, got '{}'", raw))
}

/// Full multi-line view of a snapshot
pub fn render(snapshot: &Snapshot) -> String {
    let mut out = Vec::new();
    let theme = if snapshot.is_dark_mode { "dark" } else { "light" };
    out.push(format!("TubeDownloader [{}] ({} mode)", snapshot.phase, theme));

    if !snapshot.url.is_empty() {
        out.push(format!("  link: {}", snapshot.url));
    }
    if let Some(error) = &snapshot.error {
        out.push(format!("  ! {}", error));
    }
    if snapshot.phase == Phase::Fetching {
        out.push("  fetching video details...".to_string());
    }

    if let Some(details) = &snapshot.video_details {
        out.push(format!("  {} - {}", details.title, details.author));
        out.push(format!(
            "  duration {}  thumbnail {}",
            format_clock(details.duration_seconds),
            details.thumbnail_url
        ));
    }

    if let (Some(format), Some(quality), Some(trim)) =
        (snapshot.format, &snapshot.quality, snapshot.trim)
    {
        let options: Vec<String> = QualityCatalog::options(format)
            .iter()
            .map(|o| {
                if o.value == quality.as_str() {
                    format!("[{}]", o.label)
                } else {
                    o.label.to_string()
                }
            })
            .collect();
        out.push(format!("  format {}  quality {}", format, options.join(", ")));
        out.push(format!(
            "  trim {} - {}  est. {}",
            format_clock(trim.start_seconds),
            format_clock(trim.end_seconds),
            snapshot.estimated_size.as_deref().unwrap_or("-")
        ));
    }

    if let Some(percent) = snapshot.progress {
        out.push(format!("  {}", progress_line(percent, snapshot.speed_label.as_deref())));
    }
    if snapshot.phase == Phase::Completed {
        out.push("  download complete".to_string());
    }

    out.join("\n")
}

/// `[#####.....]  42%  3.1 MB/s`
pub fn progress_line(percent: f64, speed: Option<&str>) -> String {
    const WIDTH: usize = 20;
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * WIDTH as f64).round() as usize;
    format!(
        "[{}{}] {:>3.0}%  {}",
        "#".repeat(filled),
        ".".repeat(WIDTH - filled),
        percent,
        speed.unwrap_or("")
    )
    .trim_end()
    .to_string()
}

pub fn render_history(snapshot: &Snapshot) -> String {
    if snapshot.history.is_empty() {
        return "No downloads yet.".to_string();
    }
    snapshot
        .history
        .iter()
        .map(|r| format!("  {}  {}  ({})", r.display_timestamp(), r.title, r.subtitle()))
        .collect::<Vec<_>>()
        .join("\n")
}
