use vergen_gitcl::{Emitter, GitclBuilder};

// VERGEN_GIT_SHA is reported by the health endpoint
fn main() -> anyhow::Result<()> {
    let gitcl = GitclBuilder::default().sha(true).build()?;
    Emitter::default().add_instructions(&gitcl)?.emit()?;

    Ok(())
}
