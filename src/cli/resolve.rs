//! `resolve` command.

use anyhow::{Context, Result, bail};
use serde::Serialize;
use std::collections::BTreeMap;

use super::ResolveArgs;
use crate::config::AppConfig;
use crate::routing::{
    ArticleReference, ContentReference, ContentUrlResult, PageReference, StringUrl,
};

/// JSON shape of a resolved reference (parameters sorted for stable output).
#[derive(Debug, Serialize)]
struct ResolveOutput<'a> {
    reference: &'a ContentReference,
    url: &'a str,
    parameters: BTreeMap<&'a str, &'a str>,
}

/// Build the content reference described by the command arguments.
fn content_from_args(args: &ResolveArgs) -> Result<ContentReference> {
    if let Some(alias) = &args.page {
        let page = PageReference::new(args.page_id, alias.as_str());
        if args.article.is_some() || args.article_id.is_some() {
            let article =
                ArticleReference::new(args.article_id.unwrap_or(0), args.article.clone(), page);
            return Ok(article.into());
        }
        return Ok(page.into());
    }

    match &args.value {
        Some(value) => Ok(StringUrl::new(value.as_str()).into()),
        None => bail!("nothing to resolve, pass a VALUE or --page"),
    }
}

/// Render a resolution result as text or JSON.
fn render(content: &ContentReference, result: &ContentUrlResult, json: bool) -> Result<String> {
    if !json {
        return Ok(result.url.clone());
    }

    let output = ResolveOutput {
        reference: content,
        url: &result.url,
        parameters: result
            .parameters
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Resolve the reference from `args` through the configured registry.
pub fn run_resolve(args: &ResolveArgs, config: &AppConfig) -> Result<()> {
    let content = content_from_args(args)?;
    let registry = config
        .registry()
        .context("Failed to set up the request context")?;

    let result = registry
        .resolve(&content)
        .with_context(|| format!("Failed to resolve {} reference", content.kind()))?;

    let Some(result) = result else {
        bail!("no resolver handles {} references", content.kind());
    };

    println!("{}", render(&content, &result, args.json)?);
    Ok(())
}
