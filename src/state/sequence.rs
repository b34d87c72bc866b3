use std::collections::HashMap;
use std::fmt::Display;

/// Logical resources that are fetched from the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Items,
    Taxonomy,
    CategoryMap,
    Recommendation,
}

impl Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Resource::Items => "items",
            Resource::Taxonomy => "taxonomy",
            Resource::CategoryMap => "category_map",
            Resource::Recommendation => "recommendation",
        };
        write!(f, "{}", name)
    }
}

/// Identifies one issued request for a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTicket {
    pub resource: Resource,
    pub seq: u64,
}

/// Issues monotonically increasing sequence numbers per resource
///
/// A response is only applied when its ticket is still the latest issued for
/// its resource, so a slow response can never overwrite a newer one.
#[derive(Debug, Clone, Default)]
pub struct Sequencer {
    latest: HashMap<Resource, u64>,
}

impl Sequencer {
    pub fn issue(&mut self, resource: Resource) -> RequestTicket {
        let seq = self.latest.entry(resource).or_insert(0);
        *seq += 1;
        RequestTicket {
            resource,
            seq: *seq,
        }
    }

    pub fn is_latest(&self, ticket: &RequestTicket) -> bool {
        self.latest.get(&ticket.resource) == Some(&ticket.seq)
    }
}
