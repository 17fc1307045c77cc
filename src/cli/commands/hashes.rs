use anyhow::Result;

use super::{CommandSummary, HashesSummary};
use crate::{cli::args::HashesCommand, core::context::ProjectContext};

pub fn hashes(cmd: HashesCommand) -> Result<CommandSummary> {
    let ctx = ProjectContext::new(&cmd.common)?;
    let observations = ctx.observe(&ctx.processor()?)?;

    let mut locations: Vec<(String, usize, String)> = observations
        .into_iter()
        .flat_map(|(file, fragments)| {
            fragments
                .into_iter()
                .map(move |f| (file.clone(), f.loc.line, f.key))
        })
        .collect();
    locations.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

    Ok(CommandSummary::Hashes(HashesSummary { locations }))
}
