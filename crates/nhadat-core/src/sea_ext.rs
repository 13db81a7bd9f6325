use sea_orm::{
    ColumnTrait, Condition, EntityTrait, QueryFilter, Select,
    sea_query::{Expr, Func, LikeExpr},
};

/// Case-insensitive substring search across several columns (`OR`-combined).
pub trait ContainsAnyIgnoreCase {
    fn contains_any_ignore_case<C>(self, columns: &[C], needle: &str) -> Self
    where
        C: ColumnTrait;
}

impl<E> ContainsAnyIgnoreCase for Select<E>
where
    E: EntityTrait,
{
    fn contains_any_ignore_case<C>(self, columns: &[C], needle: &str) -> Self
    where
        C: ColumnTrait,
    {
        let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
        let condition = columns.iter().fold(Condition::any(), |cond, col| {
            cond.add(
                Expr::expr(Func::lower(Expr::col(col.as_column_ref())))
                    .like(LikeExpr::new(pattern.clone()).escape('\\')),
            )
        });
        self.filter(condition)
    }
}

/// Escape LIKE wildcards so user input matches literally.
pub fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
