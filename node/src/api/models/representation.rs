use crate::publisher::{DescriptorOptions, Representation};
use std::collections::HashMap;

/// Representation selection flags of resource lookups.
///
/// A flag is set when present with any value other than `false`, so `?swagger` and `?swagger=1` both count.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RepresentationQuery {
    pub descriptor: bool,
    pub ui: bool,
    pub abi: bool,
    pub factory: bool,
    pub refresh: bool,
    pub download: bool,
    /// Explicit basic auth advertisement, from `noauth`
    pub basic_auth: Option<bool>,
    pub schemes: Option<String>,
    pub from: Option<String>,
}

fn flag(query: &HashMap<String, String>, name: &str) -> Option<bool> {
    query.get(name).map(|value| value.to_lowercase() != "false")
}

impl RepresentationQuery {
    pub fn from_query(query: &HashMap<String, String>) -> Self {
        let enabled = |name| flag(query, name).unwrap_or(false);
        Self {
            descriptor: enabled("swagger") || enabled("openapi"),
            ui: enabled("ui"),
            abi: enabled("abi"),
            factory: enabled("factory"),
            refresh: enabled("refresh"),
            download: query.contains_key("download"),
            basic_auth: flag(query, "noauth").map(|noauth| !noauth),
            schemes: query.get("schemes").cloned(),
            from: query.get("from").filter(|from| !from.is_empty()).cloned(),
        }
    }

    /// Page first, then descriptor, then raw interface, summary when nothing was asked for
    pub fn representation(&self) -> Representation {
        if self.ui {
            Representation::HumanPage {
                factory_only: self.factory,
                from: self.from.clone(),
            }
        } else if self.descriptor {
            Representation::Descriptor(DescriptorOptions {
                factory_only: self.factory,
                basic_auth: self.basic_auth,
                schemes: self.schemes.clone(),
                from: self.from.clone(),
            })
        } else if self.abi {
            Representation::RawInterface
        } else {
            Representation::Summary
        }
    }
}
