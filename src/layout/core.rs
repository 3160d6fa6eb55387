use crate::error::Result;
use crate::record::{Record, Schema, conform, describe};
use crate::tree::ComponentTree;

/// One way of turning records into a component tree.
///
/// Implementations are stateless and deterministic: the same schema and
/// records always produce the same tree.
pub trait LayoutStrategy<R: Record>: Send + Sync {
    fn name(&self) -> &str;

    fn layout(&self, schema: &Schema, records: &[R]) -> Result<ComponentTree>;
}

/// Hand-authored strategy: the caller's builder is invoked as-is.
///
/// Component names in the returned tree are not checked. The builder must
/// return a valid tree for an empty record slice too.
pub struct ManualTree<F> {
    name: String,
    build: F,
}

impl<F> ManualTree<F> {
    pub fn new<R>(name: impl Into<String>, build: F) -> Self
    where
        R: Record,
        F: Fn(&Schema, &[R]) -> ComponentTree + Send + Sync,
    {
        Self {
            name: name.into(),
            build,
        }
    }
}

impl<R, F> LayoutStrategy<R> for ManualTree<F>
where
    R: Record,
    F: Fn(&Schema, &[R]) -> ComponentTree + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn layout(&self, schema: &Schema, records: &[R]) -> Result<ComponentTree> {
        Ok((self.build)(schema, records))
    }
}

/// Check every record against `schema` before any tree is built.
pub fn validate_records<R: Record>(schema: &Schema, records: &[R]) -> Result<()> {
    for (index, record) in records.iter().enumerate() {
        conform(schema, record, index)?;
    }
    Ok(())
}

/// Apply `strategy` without a registry binding.
pub fn project_with<R: Record>(
    strategy: &dyn LayoutStrategy<R>,
    records: &[R],
) -> Result<ComponentTree> {
    let schema = describe::<R>()?;
    validate_records(&schema, records)?;
    strategy.layout(&schema, records)
}
