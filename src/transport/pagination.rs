use crate::domain::{Pagination, WireContract};

pub fn encode_pagination_query(
    contract: WireContract,
    pagination: &Pagination,
) -> Vec<(String, String)> {
    let (page_key, limit_key) = match contract {
        WireContract::RevisionA => ("page", "limit"),
        WireContract::RevisionB => ("pageIndex", "max"),
    };

    let mut query = Vec::<(String, String)>::new();
    if let Some(page) = pagination.page {
        query.push((page_key.to_owned(), page.to_string()));
    }
    if let Some(limit) = pagination.limit {
        query.push((limit_key.to_owned(), limit.to_string()));
    }
    query
}
