//! Data-access layer.
//!
//! Every function takes the connection it should run on, so callers decide
//! the transaction scope: open one with `TransactionTrait::begin`, pass it
//! in, and commit. An uncommitted transaction rolls back when dropped.

pub mod actor;
pub mod director;
pub mod genre;
pub mod movie;
pub mod review;

use sea_orm::{
    EntityTrait, QuerySelect, Select,
    sea_query::{Expr, Func, IntoColumnRef, LikeExpr, SimpleExpr},
};

/// Offset pagination window.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Page {
    pub skip: u64,
    pub limit: u64,
}

impl Page {
    pub const DEFAULT_LIMIT: u64 = 100;
    pub const MAX_LIMIT: u64 = 1000;

    /// Largest offset SQLite binds; it takes signed 64-bit integers.
    pub const MAX_SKIP: u64 = i64::MAX as u64;

    pub fn new(skip: u64, limit: u64) -> Self {
        Self { skip: skip.min(Self::MAX_SKIP), limit: limit.clamp(1, Self::MAX_LIMIT) }
    }

    pub(crate) fn apply<E: EntityTrait>(self, query: Select<E>) -> Select<E> {
        query.offset(self.skip).limit(self.limit)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self { skip: 0, limit: Self::DEFAULT_LIMIT }
    }
}

/// `lower(col) LIKE '%term%'`, with LIKE wildcards in `term` matched literally.
///
/// SQLite's `lower()` folds ASCII only, so the term is folded the same way.
pub(crate) fn contains_ci<C: IntoColumnRef>(col: C, term: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(col))).like(LikeExpr::new(like_pattern(term)).escape('\\'))
}

fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.to_ascii_lowercase().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Drops repeated ids while keeping first-seen order.
pub(crate) fn unique_ids(ids: &[i32]) -> Vec<i32> {
    let mut out = Vec::with_capacity(ids.len());
    for &id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}
