use crate::{Context, Error};

/// Show this help menu
#[poise::command(prefix_command, track_edits)]
pub async fn help(
    ctx: Context<'_>,
    #[description = "Specific command to show help about"]
    #[rest]
    command: Option<String>,
) -> Result<(), Error> {
    let footer = format!(
        "Type {}help <command> for more info on a command.",
        ctx.prefix()
    );
    let config = poise::builtins::HelpConfiguration {
        extra_text_at_bottom: &footer,
        ..Default::default()
    };
    poise::builtins::help(ctx, command.as_deref(), config).await?;
    Ok(())
}
