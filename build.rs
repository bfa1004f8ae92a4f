use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // VERGEN_GIT_SHA and VERGEN_GIT_DIRTY feed `core::version::version()`
    vergen_gitcl::Emitter::default()
        .add_instructions(
            &vergen_gitcl::GitclBuilder::default()
                .sha(true)
                .dirty(true)
                .build()?,
        )?
        .emit()?;
    Ok(())
}
