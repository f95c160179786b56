//! Clients derived from converted leads.
//!
//! A client is an organization that bought at least once. Clients are never
//! stored; they are rebuilt from the current lead list on every call, so
//! they appear and disappear as leads change status or organization text.

use crate::models::{Client, Contact, Lead, Purchase};
use std::collections::{BTreeMap, BTreeSet};

/// Grouping key: organization name trimmed and lower-cased.
#[must_use]
pub fn client_key(organization: &str) -> String {
    organization.trim().to_lowercase()
}

/// Builds the client list from `leads`, ordered by client key.
///
/// Only converted leads contribute. A client is recurring once it has
/// bought two or more distinct courses.
#[must_use]
pub fn derive_clients(leads: &[Lead]) -> Vec<Client> {
    let mut by_key: BTreeMap<String, Client> = BTreeMap::new();

    for lead in leads.iter().filter(|l| l.is_converted()) {
        let key = client_key(&lead.contact.organization);
        let value = lead.effective_value();
        let purchase = Purchase {
            course_id: lead.course_id,
            date: lead.converted_on,
            value,
        };

        let client = by_key.entry(key.clone()).or_insert_with(|| Client {
            key,
            organization: lead.contact.organization.trim().to_string(),
            city: lead.contact.city.clone(),
            region: lead.contact.region.clone(),
            contacts: Vec::new(),
            purchases: Vec::new(),
            total_spent: 0.0,
            last_purchase: None,
            recurring: false,
        });

        if !client.contacts.iter().any(|c| same_person(c, &lead.contact)) {
            client.contacts.push(lead.contact.clone());
        }
        client.purchases.push(purchase);
        client.total_spent += value;
        client.last_purchase = client.last_purchase.max(lead.converted_on);
    }

    by_key
        .into_values()
        .map(|mut client| {
            client.purchases.sort_by_key(|p| (p.date, p.course_id));
            let courses: BTreeSet<i64> = client.purchases.iter().map(|p| p.course_id).collect();
            client.recurring = courses.len() >= 2;
            client
        })
        .collect()
}

fn same_person(a: &Contact, b: &Contact) -> bool {
    a.name.trim().eq_ignore_ascii_case(b.name.trim()) && a.email == b.email
}
