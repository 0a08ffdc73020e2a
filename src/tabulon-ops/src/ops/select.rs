//! Selecting, removing, renaming and parsing columns.

use common_config::ParserOptions;
use common_error::TabulonResult;
use tabulon_core::{ColumnPath, DataFrame, UnresolvedColumnsPolicy};

use crate::remove::remove_impl;
use crate::selector::ColumnSet;

use super::MoveClause;

pub(crate) fn remove(df: &DataFrame, columns: &ColumnSet) -> TabulonResult<DataFrame> {
    Ok(remove_impl(df, columns, false)?.df)
}

/// The selected columns as top-level columns, in selection order.
pub(crate) fn select(df: &DataFrame, columns: &ColumnSet) -> TabulonResult<DataFrame> {
    let selected = columns
        .resolve(df, UnresolvedColumnsPolicy::Fail)?
        .into_iter()
        .map(|c| c.into_column())
        .collect::<TabulonResult<Vec<_>>>()?;
    DataFrame::with_nrow(selected, df.nrow())
}

pub(crate) fn rename(df: &DataFrame, path: ColumnPath, new_name: &str) -> TabulonResult<DataFrame> {
    MoveClause::new(df, path).into(|c| c.path().rename(new_name))
}

/// Parse the selected columns in place. Group columns parse everything
/// they contain.
pub(crate) fn parse_cols(
    df: &DataFrame,
    columns: &ColumnSet,
    options: &ParserOptions,
) -> TabulonResult<DataFrame> {
    let mut out = df.clone();
    for selected in columns.resolve(df, UnresolvedColumnsPolicy::Fail)? {
        let parsed = selected.column()?.try_parse(options)?;
        out = out.replace_at(selected.path(), parsed)?;
    }
    Ok(out)
}
