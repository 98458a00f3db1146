//! Property-based tests using proptest
//!
//! These tests check that Terraform models and API models convert into each
//! other without losing or inventing values, including through the YAML
//! entity descriptor.

use proptest::prelude::*;
use terraform_provider_cortex::catalog::descriptor::{entity_from_yaml, entity_to_yaml};
use terraform_provider_cortex::catalog::entity::{CatalogEntityData, EntityLink};
use terraform_provider_cortex::catalog::owner::EntityOwner;
use terraform_provider_cortex::catalog::scorecard::{
    IncludeExclude, Scorecard, ScorecardFilter, UpsertScorecardRequest,
};
use terraform_provider_cortex::provider::resources::catalog_entity::blocks::OwnerModel;
use terraform_provider_cortex::provider::resources::scorecard::{
    FilterModel, IncludeExcludeModel, ScorecardResourceModel,
};
use terraform_provider_cortex::provider::resources::LinkModel;

/// Identifier-like text that YAML never reads as a bool, null or number
fn arb_word() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,20}".prop_map(|s| format!("x-{}", s))
}

fn arb_description() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[A-Za-z][A-Za-z0-9 ,.]{0,40}".prop_map(|s| s.trim_end().to_string()))
        .prop_map(|d| d.filter(|d| !d.is_empty()))
}

/// Generate an owner of any kind
fn arb_owner() -> impl Strategy<Value = EntityOwner> {
    prop_oneof![
        (arb_word(), arb_description()).prop_map(|(user, description)| EntityOwner::Email {
            email: format!("{}@example.com", user),
            description,
        }),
        (
            arb_word(),
            prop::option::of(prop::sample::select(vec!["OKTA", "GITHUB", "AZURE_AD"])),
            arb_description(),
            prop::option::of(prop::sample::select(vec!["APPEND", "FALLBACK", "NONE"])),
        )
            .prop_map(|(name, provider, description, inheritance)| EntityOwner::Group {
                name,
                provider: provider.map(str::to_string),
                description,
                inheritance: inheritance.map(str::to_string),
            }),
        (arb_word(), any::<bool>(), arb_description()).prop_map(
            |(channel, notifications_enabled, description)| EntityOwner::Slack {
                channel,
                notifications_enabled,
                description,
            }
        ),
    ]
}

fn arb_link() -> impl Strategy<Value = EntityLink> {
    (
        arb_word(),
        prop::sample::select(vec!["documentation", "runbook", "logs", "dashboard"]),
        arb_word(),
        arb_description(),
    )
        .prop_map(|(name, kind, path, description)| EntityLink {
            name,
            kind: kind.to_string(),
            url: format!("https://example.com/{}", path),
            description,
        })
}

fn arb_include_exclude() -> impl Strategy<Value = IncludeExclude> {
    (
        prop::collection::vec(arb_word(), 0..4),
        prop::collection::vec(arb_word(), 0..4),
    )
        .prop_map(|(include, exclude)| IncludeExclude { include, exclude })
}

fn arb_filter() -> impl Strategy<Value = ScorecardFilter> {
    (
        prop::option::of(prop_oneof![Just(String::new()), arb_word()]),
        prop::option::of(prop_oneof![Just(String::new()), arb_word()]),
        prop::option::of(arb_include_exclude()),
        prop::option::of(arb_include_exclude()),
    )
        .prop_map(|(category, query, types, groups)| ScorecardFilter {
            category,
            query,
            types,
            groups,
        })
}

proptest! {
    /// Owners survive the trip through the Terraform model
    #[test]
    fn owner_model_round_trip(owner in arb_owner()) {
        let model = OwnerModel::from_api_model(&owner, None);
        prop_assert_eq!(model.to_api_model().unwrap(), owner);
    }

    /// Owners survive the trip through the entity descriptor
    #[test]
    fn owners_descriptor_round_trip(owners in prop::collection::vec(arb_owner(), 0..5)) {
        let mut data = CatalogEntityData::new("payments", "Payments");
        data.owners = owners.clone();
        let yaml = entity_to_yaml(&data).unwrap();
        let decoded = entity_from_yaml(&yaml).unwrap();
        prop_assert_eq!(decoded.owners, owners);
    }

    /// Links keep a null description null
    #[test]
    fn link_model_round_trip(link in arb_link()) {
        let model = LinkModel::from_api_model(&link);
        prop_assert_eq!(&model.to_api_model(), &link);
        prop_assert_eq!(model.description.is_none(), link.description.is_none());
    }

    /// Links survive the trip through the entity descriptor
    #[test]
    fn links_descriptor_round_trip(links in prop::collection::vec(arb_link(), 0..5)) {
        let mut data = CatalogEntityData::new("payments", "Payments");
        data.links = links.clone();
        let yaml = entity_to_yaml(&data).unwrap();
        prop_assert_eq!(entity_from_yaml(&yaml).unwrap().links, links);
    }

    /// Empty include/exclude lists read back as a null block
    #[test]
    fn empty_include_exclude_is_null(filter in arb_filter()) {
        let model = FilterModel::from_api_model(&filter, None);
        let types_set = filter
            .types
            .as_ref()
            .is_some_and(|t| !t.include.is_empty() || !t.exclude.is_empty());
        prop_assert_eq!(model.types.is_some(), types_set);
        prop_assert!(model.category.as_deref() != Some(""));
        prop_assert!(model.query.as_deref() != Some(""));
    }

    /// A filter without any criteria is never sent, and reads back as null
    #[test]
    fn disabled_filter_is_dropped(filter in arb_filter()) {
        let enabled = FilterModel::from_api_model(&filter, None) != FilterModel::default();
        let scorecard = Scorecard {
            tag: "test-scorecard".to_string(),
            name: "Test".to_string(),
            filter: Some(filter),
            ..Scorecard::default()
        };

        let request = UpsertScorecardRequest::from(&scorecard);
        prop_assert_eq!(request.filter.is_some(), enabled);

        let model = ScorecardResourceModel::from_api_model(&scorecard, None);
        prop_assert_eq!(model.filter.is_some(), enabled);
    }

    /// Populated filter models convert to the API and back unchanged
    #[test]
    fn filter_model_round_trip(
        category in prop::option::of(arb_word()),
        query in prop::option::of(arb_word()),
        include in prop::collection::vec(arb_word(), 1..4),
        exclude in prop::option::of(prop::collection::vec(arb_word(), 0..4)),
    ) {
        let model = FilterModel {
            category,
            query,
            types: Some(IncludeExcludeModel {
                include: Some(include),
                exclude,
            }),
            groups: None,
        };
        prop_assert_eq!(
            FilterModel::from_api_model(&model.to_api_model(), Some(&model)),
            model
        );
    }
}
