//! Reconciliation of managed records against a parsed configuration
//!
//! Produces the three-way partition (matched, manager-only, file-only) plus
//! field-level port mismatches. Matching is by exact, case-sensitive name
//! membership and is first-match-wins: once a server block is claimed by a
//! record it is out of consideration for later records.

use crate::extract::listen_port_and_tls;
use crate::parser::ServerBlock;
use domainly_core::DomainRecord;
use serde::{Deserialize, Serialize};

/// A record and a server block that disagree on the port
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortMismatch {
    pub name: String,
    pub managed_port: u16,
    pub file_port: u16,
}

/// Result of comparing managed records with parsed server blocks
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    /// Present in both, paired up
    pub matched: Vec<(DomainRecord, ServerBlock)>,
    /// Managed records no server block answers for
    pub manager_only: Vec<DomainRecord>,
    /// Server blocks no managed record claims
    pub file_only: Vec<ServerBlock>,
    pub port_mismatches: Vec<PortMismatch>,
}

/// Compare managed records against parsed server blocks
pub fn compare(records: &[DomainRecord], servers: &[ServerBlock]) -> Reconciliation {
    let mut result = Reconciliation::default();
    let mut remaining: Vec<ServerBlock> = servers.to_vec();

    for record in records {
        let position = remaining
            .iter()
            .position(|server| server.server_names.iter().any(|n| n == &record.name));

        match position {
            Some(idx) => {
                let server = remaining.remove(idx);

                let (file_port, _) = listen_port_and_tls(&server.listen);
                let managed_port = record.effective_port();
                if managed_port != file_port {
                    result.port_mismatches.push(PortMismatch {
                        name: record.name.clone(),
                        managed_port,
                        file_port,
                    });
                }

                result.matched.push((record.clone(), server));
            }
            None => result.manager_only.push(record.clone()),
        }
    }

    result.file_only = remaining;
    result
}
