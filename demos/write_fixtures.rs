use h5fixture::fixtures::{self, CompoundFixture, Fixture};
use h5fixture::{File, Result, Storage};
use tracing::info;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let files = fixtures::write_all()?; // every fixture, each in its own file
    for file in &files {
        for ds in file.datasets()? {
            info!(file = %file.filename(), dataset = ds.name(), shape = %ds.space(), dtype = %ds.dtype());
        }
    }

    let file = File::open("compound_example.h5")?; // reopen read-only, as a consumer would
    let fixture = CompoundFixture::default();
    for record in fixture.preview(&file, 10)? {
        info!(
            id = record.record_id,
            var_str = %record.var_str,
            int8 = record.int8_val,
            uint64 = record.uint64_val,
            scaled = %record.scaled_uint_val,
            "compound record"
        );
    }
    let revision = file.dataset("CompoundData")?.attr("GIT root revision")?;
    info!(revision = %revision.read_scalar::<String>()?, "attribute");
    info!(output = fixture.output(), "done");
    Ok(())
}
