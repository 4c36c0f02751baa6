use crate::context::CliContext;
use anyhow::Result;
use reelhub_core::moderation::ContentPolicyFilter;

pub async fn check(ctx: &CliContext, text: &str) -> Result<()> {
    let backend = ctx.backend()?;
    let terms = ContentPolicyFilter::new(backend.banned_words)
        .check_text(text)
        .await?;

    if terms.is_empty() {
        println!("no match");
    } else {
        for term in terms {
            println!("{}", term);
        }
    }
    Ok(())
}
