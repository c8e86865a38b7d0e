// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Pagination helpers for Kubernetes API list operations.
//!
//! Lists are fetched in pages to bound memory use and API server load. Item
//! order is the order the API server returns, page after page, which is the
//! "listing order" scale-down victims are taken from.

use crate::constants::KUBE_LIST_PAGE_SIZE;
use kube::{api::ListParams, Api, Resource};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use tracing::debug;

/// List all resources matching `list_params`, one page at a time.
///
/// # Example
///
/// ```no_run
/// use kube::{Api, Client, api::ListParams};
/// use k8s_openapi::api::core::v1::Pod;
/// use jedy::pagination::list_all_paginated;
///
/// # async fn example() -> Result<(), kube::Error> {
/// let client = Client::try_default().await?;
/// let api: Api<Pod> = Api::namespaced(client, "default");
///
/// let pods = list_all_paginated(&api, ListParams::default().labels("app=cache1")).await?;
/// println!("Found {} workers", pods.len());
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns the first Kubernetes API error encountered. Items from earlier
/// pages are discarded.
pub async fn list_all_paginated<K>(
    api: &Api<K>,
    mut list_params: ListParams,
) -> Result<Vec<K>, kube::Error>
where
    K: Resource<DynamicType = ()> + Clone + DeserializeOwned + Debug,
{
    list_params.limit = Some(KUBE_LIST_PAGE_SIZE);

    let mut all_items = Vec::new();
    let mut page_count = 0;

    loop {
        page_count += 1;
        let result = api.list(&list_params).await?;

        let item_count = result.items.len();
        all_items.extend(result.items);

        debug!(
            page = page_count,
            items_in_page = item_count,
            total_items = all_items.len(),
            "Fetched page from Kubernetes API"
        );

        match result.metadata.continue_ {
            Some(token) if !token.is_empty() => list_params.continue_token = Some(token),
            _ => break,
        }
    }

    Ok(all_items)
}
