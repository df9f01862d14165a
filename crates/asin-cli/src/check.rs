use std::fs;

use serde::Serialize;

use asin_core::{Decision, Redirector};

pub struct CheckOptions {
    pub urls: Vec<String>,
    pub input: Option<String>,
    pub json: bool,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct CheckLine<'a> {
    url: &'a str,
    action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    asin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    shape: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'static str>,
}

impl<'a> CheckLine<'a> {
    fn new(url: &'a str, decision: &'a Decision) -> Self {
        let mut line = Self {
            url,
            action: decision.action(),
            target: None,
            asin: None,
            shape: None,
            reason: None,
        };
        match decision {
            Decision::Redirect { asin, shape, target } => {
                line.target = Some(target.as_str());
                line.asin = Some(asin.to_string());
                line.shape = Some(shape.as_str());
            }
            Decision::Ignored(reason) => line.reason = Some(reason.as_str()),
            Decision::Canonical => {}
        }
        line
    }

    fn to_text(&self) -> String {
        match (self.target, self.shape, self.reason) {
            (Some(target), Some(shape), _) => {
                format!("redirect   {} -> {} ({})", self.url, target, shape)
            }
            (_, _, Some(reason)) => format!("ignore     {} ({})", self.url, reason),
            _ => format!("canonical  {}", self.url),
        }
    }
}

pub fn run_check(opts: CheckOptions, redirector: &Redirector) -> Result<(), String> {
    let mut urls = opts.urls;
    if let Some(path) = &opts.input {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read '{}': {}", path, e))?;
        urls.extend(read_urls(&content));
    }

    if urls.is_empty() {
        return Err("No URLs given".to_string());
    }

    let mut redirects = 0usize;
    for url in &urls {
        let decision = redirector.evaluate_url(url);
        if decision.target().is_some() {
            redirects += 1;
        }

        let line = CheckLine::new(url, &decision);
        if opts.json {
            let json = serde_json::to_string(&line)
                .map_err(|e| format!("Failed to serialize JSON: {}", e))?;
            println!("{}", json);
        } else {
            println!("{}", line.to_text());
        }
    }

    if !opts.json {
        println!();
        println!("{} URL(s), {} redirect(s)", urls.len(), redirects);
    }

    Ok(())
}

/// One URL per line; blank lines and `#` comments are skipped.
fn read_urls(content: &str) -> impl Iterator<Item = String> + '_ {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
}
