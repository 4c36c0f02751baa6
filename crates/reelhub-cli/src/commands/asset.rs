use crate::context::CliContext;
use anyhow::Result;
use reelhub_core::media::AssetKind;

pub fn resolve(ctx: &CliContext, url: &str, kind: AssetKind) -> Result<()> {
    match ctx.url_codec()?.resolve_path(kind, url) {
        Some(path) => println!("{}", path),
        None => println!("no match"),
    }
    Ok(())
}
