/// Builds a [`BooleanQuery`](crate::core::query::BooleanQuery) from
/// `query => occur` pairs, failing like `BooleanQuery::add` does.
#[macro_export]
macro_rules! boolean_query(
    () => {
        {
            let query: $crate::Result<$crate::core::query::BooleanQuery> =
                Ok($crate::core::query::BooleanQuery::new());
            query
        }
    };
    ($($query:expr => $occur:expr),*) => {
        {
            (|| -> $crate::Result<$crate::core::query::BooleanQuery> {
                let mut query = $crate::core::query::BooleanQuery::new();
                $(
                    query.add($crate::core::query::Query::from($query), $occur)?;
                )*
                Ok(query)
            })()
        }
    };
    // if there is a trailing comma retry with the trailing comma stripped.
    ($($query:expr => $occur:expr),+ ,) => {
        $crate::boolean_query!( $( $query => $occur ), *)
    };
);
