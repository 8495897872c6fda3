mod quantity;
mod ranking;

pub use quantity::parse_memory_gb;
pub use ranking::rank_by_queue_depth;

use std::sync::Arc;

use crate::error::BrokerError;
use crate::events::{BrokerEvent, EventSink, ExclusionReason};
use crate::models::{ClusterRecord, Constraints, MemoryPolicy, ResourceRequest};
use crate::registry::ClusterRegistry;

/// Eligible clusters for one request, in registry declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult<'a> {
    clusters: Vec<&'a ClusterRecord>,
}

impl<'a> MatchResult<'a> {
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a ClusterRecord> + '_ {
        self.clusters.iter().copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.clusters.iter().any(|c| c.name == name)
    }

    pub fn names(&self) -> Vec<&'a str> {
        self.clusters.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn into_vec(self) -> Vec<&'a ClusterRecord> {
        self.clusters
    }
}

/// Matcher filters a registry snapshot against a ResourceRequest.
///
/// Filtering is first-fit-all: every eligible cluster is returned, nothing is
/// scored or reordered. It holds no state between calls and can be shared
/// freely across threads.
pub struct Matcher {
    memory_policy: MemoryPolicy,
    events: Arc<dyn EventSink>,
}

impl Matcher {
    pub fn new(memory_policy: MemoryPolicy, events: Arc<dyn EventSink>) -> Self {
        Self {
            memory_policy,
            events,
        }
    }

    /// Validate a request and resolve its memory quantity
    pub fn normalize(&self, request: &ResourceRequest) -> Result<Constraints, BrokerError> {
        let cpus = u64::try_from(request.cpu_count)
            .map_err(|_| BrokerError::invalid(format!("cpu count must not be negative (got {})", request.cpu_count)))?;
        let gpus = u64::try_from(request.gpu_count)
            .map_err(|_| BrokerError::invalid(format!("gpu count must not be negative (got {})", request.gpu_count)))?;
        let memory_gb = parse_memory_gb(request.memory.as_deref(), self.memory_policy)?;

        Ok(Constraints {
            cpus,
            memory_gb,
            gpus,
        })
    }

    /// Return every Active cluster in `registry` that satisfies `request`
    pub fn match_request<'a>(
        &self,
        registry: &'a ClusterRegistry,
        request: &ResourceRequest,
    ) -> Result<MatchResult<'a>, BrokerError> {
        let constraints = self.normalize(request)?;

        let mut clusters = Vec::new();
        for record in registry.list_all() {
            match check(record, &constraints) {
                Ok(()) => {
                    self.events.emit(BrokerEvent::ClusterAccepted {
                        cluster: record.name.clone(),
                    });
                    clusters.push(record);
                }
                Err(reason) => {
                    self.events.emit(BrokerEvent::ClusterExcluded {
                        cluster: record.name.clone(),
                        reason,
                    });
                }
            }
        }

        self.events.emit(BrokerEvent::MatchCompleted {
            considered: registry.len(),
            matched: clusters.len(),
        });
        Ok(MatchResult { clusters })
    }
}

/// Apply the exclusion rules in order: status, CPUs, memory, GPUs.
/// The first failing rule is reported.
pub fn check(record: &ClusterRecord, constraints: &Constraints) -> Result<(), ExclusionReason> {
    if !record.status.is_active() {
        return Err(ExclusionReason::NotActive(record.status));
    }
    if u64::from(record.max_cpus) < constraints.cpus {
        return Err(ExclusionReason::InsufficientCpus {
            available: record.max_cpus,
            requested: constraints.cpus,
        });
    }
    if record.memory_gb < constraints.memory_gb {
        return Err(ExclusionReason::InsufficientMemory {
            available: record.memory_gb,
            requested: constraints.memory_gb,
        });
    }
    // a zero GPU request imposes nothing, even on GPU-less clusters
    if constraints.gpus > 0 && u64::from(record.gpu_count) < constraints.gpus {
        return Err(ExclusionReason::InsufficientGpus {
            available: record.gpu_count,
            requested: constraints.gpus,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{NoopSink, RecordingSink};
    use crate::models::{ClusterClass, ClusterStatus};
    use crate::registry::demo_fleet;

    fn record(name: &str, cpus: u32, mem: u64, gpus: u32, status: ClusterStatus) -> ClusterRecord {
        ClusterRecord {
            name: name.to_string(),
            max_cpus: cpus,
            memory_gb: mem,
            gpu_count: gpus,
            gpu_description: if gpus == 0 { "No".into() } else { format!("{} GPUs", gpus) },
            jobs_in_queue: 0,
            owner: "ops@example.org".to_string(),
            class: ClusterClass::Hpc,
            status,
        }
    }

    /// A(128/256/0 active), B(96/192/4 active), C(256/512/0 maintenance)
    fn abc_registry() -> ClusterRegistry {
        ClusterRegistry::new(vec![
            record("A", 128, 256, 0, ClusterStatus::Active),
            record("B", 96, 192, 4, ClusterStatus::Active),
            record("C", 256, 512, 0, ClusterStatus::Maintenance),
        ])
        .unwrap()
    }

    fn matcher() -> Matcher {
        Matcher::new(MemoryPolicy::Reject, Arc::new(NoopSink))
    }

    #[test]
    fn test_cpu_and_memory_request_matches_in_declaration_order() {
        let registry = abc_registry();
        let result = matcher()
            .match_request(&registry, &ResourceRequest::new(64, "128 GB", 0))
            .unwrap();
        assert_eq!(result.names(), vec!["A", "B"]);
    }

    #[test]
    fn test_gpu_request_excludes_gpu_less_clusters() {
        let registry = abc_registry();
        let result = matcher()
            .match_request(&registry, &ResourceRequest::new(32, "64 GB", 2))
            .unwrap();
        assert_eq!(result.names(), vec!["B"]);
    }

    #[test]
    fn test_zero_request_excludes_only_by_status() {
        let registry = abc_registry();
        let result = matcher()
            .match_request(&registry, &ResourceRequest::new(0, "0 GB", 0))
            .unwrap();
        assert_eq!(result.names(), vec!["A", "B"]);
    }

    #[test]
    fn test_blank_memory_without_override_is_invalid() {
        let registry = abc_registry();
        let err = matcher()
            .match_request(&registry, &ResourceRequest::new(0, "", 0))
            .unwrap_err();
        assert!(matches!(err, BrokerError::InvalidRequest(_)));
    }

    #[test]
    fn test_blank_memory_with_override_is_unconstrained() {
        let registry = abc_registry();
        let matcher = Matcher::new(MemoryPolicy::NoConstraint, Arc::new(NoopSink));
        let request = ResourceRequest {
            cpu_count: 0,
            memory: None,
            gpu_count: 0,
            wall_time_minutes: 30,
        };
        assert_eq!(matcher.match_request(&registry, &request).unwrap().names(), vec!["A", "B"]);
    }

    #[test]
    fn test_empty_registry_is_not_an_error() {
        let registry = ClusterRegistry::empty();
        let result = matcher()
            .match_request(&registry, &ResourceRequest::new(512, "4096 GB", 8))
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_negative_counts_are_invalid() {
        let registry = abc_registry();
        for request in [ResourceRequest::new(-1, "1 GB", 0), ResourceRequest::new(1, "1 GB", -2)] {
            let err = matcher().match_request(&registry, &request).unwrap_err();
            assert!(matches!(err, BrokerError::InvalidRequest(_)), "{request:?}");
        }
    }

    #[test]
    fn test_wall_time_does_not_filter() {
        let registry = abc_registry();
        let short = ResourceRequest::new(1, "1 GB", 0).with_wall_time(1);
        let long = ResourceRequest::new(1, "1 GB", 0).with_wall_time(100_000);
        assert_eq!(
            matcher().match_request(&registry, &short).unwrap(),
            matcher().match_request(&registry, &long).unwrap()
        );
    }

    #[test]
    fn test_exact_capacity_is_sufficient() {
        let registry = abc_registry();
        let result = matcher()
            .match_request(&registry, &ResourceRequest::new(96, "192 GB", 4))
            .unwrap();
        assert_eq!(result.names(), vec!["B"]);
    }

    #[test]
    fn test_check_reports_first_failing_rule() {
        let c = record("C", 8, 16, 0, ClusterStatus::Offline);
        let huge = Constraints { cpus: 1000, memory_gb: 1000, gpus: 8 };
        assert_eq!(check(&c, &huge), Err(ExclusionReason::NotActive(ClusterStatus::Offline)));

        let a = record("A", 8, 16, 0, ClusterStatus::Active);
        assert_eq!(
            check(&a, &huge),
            Err(ExclusionReason::InsufficientCpus { available: 8, requested: 1000 })
        );
        assert_eq!(
            check(&a, &Constraints { cpus: 8, memory_gb: 32, gpus: 0 }),
            Err(ExclusionReason::InsufficientMemory { available: 16, requested: 32 })
        );
        assert_eq!(
            check(&a, &Constraints { cpus: 8, memory_gb: 16, gpus: 1 }),
            Err(ExclusionReason::InsufficientGpus { available: 0, requested: 1 })
        );
    }

    #[test]
    fn test_events_describe_each_decision() {
        let registry = abc_registry();
        let sink = Arc::new(RecordingSink::default());
        let matcher = Matcher::new(MemoryPolicy::Reject, sink.clone());
        matcher
            .match_request(&registry, &ResourceRequest::new(100, "0 GB", 0))
            .unwrap();

        assert_eq!(
            sink.events(),
            vec![
                BrokerEvent::ClusterAccepted { cluster: "A".into() },
                BrokerEvent::ClusterExcluded {
                    cluster: "B".into(),
                    reason: ExclusionReason::InsufficientCpus { available: 96, requested: 100 },
                },
                BrokerEvent::ClusterExcluded {
                    cluster: "C".into(),
                    reason: ExclusionReason::NotActive(ClusterStatus::Maintenance),
                },
                BrokerEvent::MatchCompleted { considered: 3, matched: 1 },
            ]
        );
    }

    #[test]
    fn test_demo_fleet_reference_queries() {
        let registry = ClusterRegistry::new(demo_fleet()).unwrap();
        let m = matcher();

        let basic = m
            .match_request(&registry, &ResourceRequest::new(64, "128 GB", 0).with_wall_time(60))
            .unwrap();
        assert_eq!(
            basic.names(),
            vec!["expanse-cpu", "expanse-cpu-test", "expanse-gpu", "jetstream-cloud"]
        );

        let gpu = m
            .match_request(&registry, &ResourceRequest::new(32, "64 GB", 2).with_wall_time(120))
            .unwrap();
        assert_eq!(gpu.names(), vec!["expanse-gpu", "jetstream-cloud"]);
    }

    #[test]
    fn test_matcher_is_shareable_across_threads() {
        let registry = Arc::new(ClusterRegistry::new(demo_fleet()).unwrap());
        let matcher = Arc::new(matcher());

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let registry = Arc::clone(&registry);
                let matcher = Arc::clone(&matcher);
                std::thread::spawn(move || {
                    let request = ResourceRequest::new(i * 32, "64 GB", 0);
                    let result = matcher.match_request(&registry, &request).unwrap();
                    result.names().iter().map(|n| n.to_string()).collect::<Vec<_>>()
                })
            })
            .collect();

        for handle in handles {
            let names = handle.join().unwrap();
            assert!(names.iter().all(|n| n != "bridges-cpu"));
        }
    }
}
