//! Helpers shared by the add/edit pages of every resource.

use api_types::Id;
use store::{CollectionState, Resource, ResourceKind};

/// Raw route parameters, as captured from a path like
/// `/transactions/:transactionID/details/:instanceID`.
#[derive(Debug, Default, Clone)]
pub struct RouteParams {
    pub instance_id: Option<String>,
    pub transaction_id: Option<String>,
}

impl RouteParams {
    pub fn instance(id: Option<Id>) -> Self {
        Self {
            instance_id: id.map(|id| id.to_string()),
            transaction_id: None,
        }
    }

    pub fn detail(transaction_id: Id, id: Option<Id>) -> Self {
        Self {
            instance_id: id.map(|id| id.to_string()),
            transaction_id: Some(transaction_id.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub label: &'static str,
    pub path: String,
}

/// The edited instance id, `None` on an add page (absent, unparsable or 0).
pub fn instance_id(params: &RouteParams) -> Option<Id> {
    parse_id(params.instance_id.as_deref())
}

/// Owning transaction of a detail page; 0 when missing.
pub fn transaction_id(params: &RouteParams) -> Id {
    parse_id(params.transaction_id.as_deref()).unwrap_or(0)
}

fn parse_id(raw: Option<&str>) -> Option<Id> {
    raw.and_then(|raw| raw.trim().parse::<Id>().ok())
        .filter(|id| *id != 0)
}

pub fn find_instance<R: Resource>(collection: &CollectionState<R>, id: Option<Id>) -> Option<&R> {
    id.and_then(|id| collection.find(id))
}

/// Where the list of `kind` lives. Details are listed per transaction.
pub fn collection_path(kind: ResourceKind, params: &RouteParams) -> String {
    match kind {
        ResourceKind::Account => "/accounts".to_string(),
        ResourceKind::Category => "/categories".to_string(),
        ResourceKind::Transaction => "/transactions".to_string(),
        ResourceKind::Detail => format!("/transactions/{}/details", transaction_id(params)),
    }
}

/// Page reached once a submit or a removal succeeded.
pub fn done_redirect(kind: ResourceKind, params: &RouteParams) -> String {
    collection_path(kind, params)
}

pub fn left_link(kind: ResourceKind, params: &RouteParams) -> Link {
    Link {
        label: "Back",
        path: collection_path(kind, params),
    }
}

pub fn right_link<R: Resource>(params: &RouteParams, instance: &R) -> Link {
    Link {
        label: "Remove",
        path: format!(
            "{}/{}/remove",
            collection_path(R::KIND, params),
            instance.id()
        ),
    }
}

pub fn page_title(kind: ResourceKind, params: &RouteParams) -> String {
    let noun = match kind {
        ResourceKind::Account => "account",
        ResourceKind::Category => "category",
        ResourceKind::Transaction => "transaction",
        ResourceKind::Detail => "detail",
    };
    match instance_id(params) {
        Some(_) => format!("Edit {noun}"),
        None => format!("Add {noun}"),
    }
}

#[cfg(test)]
mod tests {
    use api_types::category::Category;

    use super::*;

    #[test]
    fn instance_id_ignores_garbage_and_zero() {
        let params = |raw: &str| RouteParams {
            instance_id: Some(raw.to_string()),
            transaction_id: None,
        };
        assert_eq!(instance_id(&params("12")), Some(12));
        assert_eq!(instance_id(&params("0")), None);
        assert_eq!(instance_id(&params("abc")), None);
        assert_eq!(instance_id(&RouteParams::default()), None);
    }

    #[test]
    fn detail_links_are_nested() {
        let params = RouteParams::detail(5, Some(2));
        assert_eq!(transaction_id(&params), 5);
        assert_eq!(
            left_link(ResourceKind::Detail, &params).path,
            "/transactions/5/details"
        );
        assert_eq!(page_title(ResourceKind::Detail, &params), "Edit detail");
        assert_eq!(
            page_title(ResourceKind::Detail, &RouteParams::detail(5, None)),
            "Add detail"
        );
    }

    #[test]
    fn right_link_points_to_removal() {
        let category = Category {
            id: 4,
            name: "Food".to_string(),
        };
        let link = right_link(&RouteParams::instance(Some(4)), &category);
        assert_eq!(link.label, "Remove");
        assert_eq!(link.path, "/categories/4/remove");
    }

    #[test]
    fn find_instance_needs_an_id() {
        let collection = CollectionState {
            items: vec![Category {
                id: 1,
                name: "Food".to_string(),
            }],
            ..CollectionState::default()
        };
        assert!(find_instance(&collection, None).is_none());
        assert!(find_instance(&collection, Some(2)).is_none());
        assert_eq!(
            find_instance(&collection, Some(1)).map(|c| c.name.as_str()),
            Some("Food")
        );
    }
}
