use crate::cache::Eviction;
use crate::config::{HierarchyConfig, LevelConfig};
use crate::hierarchy::CacheHierarchy;
use crate::simulator::{SimulationReport, Simulator};
use crate::util::{small_config, AddressStream};

fn level(sets: u32, associativity: u32, hit_time: u32) -> LevelConfig {
    LevelConfig {
        sets,
        associativity,
        hit_time,
    }
}

fn disabled() -> LevelConfig {
    level(0, 0, 0)
}

#[test]
fn single_set_two_way_thrashes() {
    // 1-set, 2-way, 4-byte blocks: 0x0, 0x4, 0x8 are three distinct tags
    // competing for two ways, so re-fetching 0x0 misses again
    let config = HierarchyConfig {
        instruction: level(1, 2, 1),
        data: disabled(),
        unified: disabled(),
        block_size: 4,
        memory_latency: 100,
        inclusive: false,
    };
    let mut hierarchy = CacheHierarchy::new(&config).unwrap();
    for address in [0x0, 0x4, 0x8, 0x0] {
        assert_eq!(hierarchy.instruction_access(address), 101);
    }
    let stats = hierarchy.statistics();
    assert_eq!(stats.instruction.references, 4);
    assert_eq!(stats.instruction.misses, 4);
    assert_eq!(stats.instruction.hits(), 0);
}

#[test]
fn latency_composes_additively() {
    let mut hierarchy = CacheHierarchy::new(&small_config()).unwrap();
    // Cold: miss at both levels, 2 + 10 + 100
    assert_eq!(hierarchy.data_access(0x100), 112);
    // First-level hit costs exactly the data hit time
    assert_eq!(hierarchy.data_access(0x100), 2);
    // 0x110 and 0x120 share data set 0 with 0x100 (4 sets, 2-way), pushing
    // 0x100 out of the data cache while it stays resident in the unified
    // level (16 sets spread them out)
    assert_eq!(hierarchy.data_access(0x110), 112);
    assert_eq!(hierarchy.data_access(0x120), 112);
    // First-level miss, unified hit: 2 + 10
    assert_eq!(hierarchy.data_access(0x100), 12);
}

#[test]
fn instruction_accesses_mirror_data_accesses() {
    let mut hierarchy = CacheHierarchy::new(&small_config()).unwrap();
    assert_eq!(hierarchy.instruction_access(0x200), 111);
    assert_eq!(hierarchy.instruction_access(0x200), 1);
    let stats = hierarchy.statistics();
    assert_eq!(stats.instruction.references, 2);
    assert_eq!(stats.instruction.misses, 1);
    assert_eq!(stats.data.references, 0);
}

#[test]
fn penalties_accumulate_downstream_cost() {
    let mut hierarchy = CacheHierarchy::new(&small_config()).unwrap();
    hierarchy.instruction_access(0x300);
    let stats = hierarchy.statistics();
    assert_eq!(stats.instruction.penalty_cycles, 110);
    assert_eq!(stats.unified.penalty_cycles, 100);
    hierarchy.instruction_access(0x300);
    let stats = hierarchy.statistics();
    assert_eq!(stats.instruction.penalty_cycles, 110);
    assert_eq!(stats.unified.references, 1);
}

fn tiny_inclusive(inclusive: bool) -> HierarchyConfig {
    // A 1-set direct-mapped unified level under a 2-way data cache makes
    // unified evictions collide with data-resident blocks immediately
    HierarchyConfig {
        instruction: level(1, 1, 1),
        data: level(1, 2, 2),
        unified: level(1, 1, 10),
        block_size: 4,
        memory_latency: 100,
        inclusive,
    }
}

#[test]
fn unified_eviction_back_invalidates_first_level() {
    let mut hierarchy = CacheHierarchy::new(&tiny_inclusive(true)).unwrap();
    assert_eq!(hierarchy.data_access(0x0), 112);
    // 0x4 evicts 0x0 from the direct-mapped unified level, which must pull
    // it out of the data cache too
    assert_eq!(hierarchy.data_access(0x4), 112);
    // Gone from both levels, so this misses all the way to memory
    assert_eq!(hierarchy.data_access(0x0), 112);
    assert_eq!(hierarchy.statistics().data.misses, 3);
}

#[test]
fn without_inclusion_the_block_survives_above() {
    let mut hierarchy = CacheHierarchy::new(&tiny_inclusive(false)).unwrap();
    hierarchy.data_access(0x0);
    hierarchy.data_access(0x4);
    // The 2-way data cache still holds 0x0 even though the unified level
    // evicted it
    assert_eq!(hierarchy.data_access(0x0), 2);
    assert_eq!(hierarchy.statistics().data.misses, 2);
}

#[test]
fn inclusion_invariant_holds_under_load() {
    let config = HierarchyConfig {
        instruction: level(2, 2, 1),
        data: level(2, 2, 1),
        unified: level(2, 2, 5),
        block_size: 4,
        memory_latency: 50,
        inclusive: true,
    };
    let mut hierarchy = CacheHierarchy::new(&config).unwrap();
    let mut addresses = AddressStream::new(0xCAFE);
    for step in 0..2000 {
        // Narrow address range to force constant conflicts
        let address = addresses.next().unwrap() & 0xFF;
        if step % 2 == 0 {
            hierarchy.instruction_access(address);
        } else {
            hierarchy.data_access(address);
        }
    }
    let unified = hierarchy.unified_level().unwrap();
    assert!(unified.resident_blocks() <= 4);
    for first in [hierarchy.instruction_level(), hierarchy.data_level()] {
        let first = first.unwrap();
        for (index, set) in first.sets().iter().enumerate() {
            assert!(set.len() <= 2);
            for &tag in set.tags() {
                let block_address = first.victim_address(Eviction { tag, index }, 0);
                assert!(
                    unified.contains(block_address),
                    "block {block_address:#x} resident above but not in the unified level"
                );
            }
        }
    }
}

#[test]
fn disabled_first_level_is_bypassed() {
    let mut config = small_config();
    config.instruction = disabled();
    let mut hierarchy = CacheHierarchy::new(&config).unwrap();
    // Instruction fetches cost exactly what a direct unified access would
    assert_eq!(hierarchy.instruction_access(0x40), 110);
    assert_eq!(hierarchy.instruction_access(0x40), 10);
    let stats = hierarchy.statistics();
    assert_eq!(stats.instruction.references, 0);
    assert_eq!(stats.instruction.misses, 0);
    assert_eq!(stats.unified.references, 2);
}

#[test]
fn disabled_unified_level_charges_memory_directly() {
    let mut config = small_config();
    config.unified = disabled();
    let mut hierarchy = CacheHierarchy::new(&config).unwrap();
    assert_eq!(hierarchy.instruction_access(0x0), 101);
    assert_eq!(hierarchy.data_access(0x0), 102);
    assert_eq!(hierarchy.instruction_access(0x0), 1);
    let stats = hierarchy.statistics();
    assert_eq!(stats.unified.references, 0);
    assert_eq!(stats.unified.misses, 0);
    assert_eq!(stats.unified.penalty_cycles, 0);
}

#[test]
fn fully_bypassed_hierarchy_is_just_memory() {
    let config = HierarchyConfig {
        instruction: disabled(),
        data: disabled(),
        unified: disabled(),
        block_size: 4,
        memory_latency: 100,
        inclusive: false,
    };
    let mut hierarchy = CacheHierarchy::new(&config).unwrap();
    assert_eq!(hierarchy.instruction_access(0xABCD), 100);
    assert_eq!(hierarchy.data_access(0xABCD), 100);
    assert_eq!(*hierarchy.statistics(), Default::default());
}

#[test]
fn simulator_replays_a_trace() {
    let trace = b"I 0x0\nD 0x0\nI 0x0\n\nd 4\n";
    let mut simulator = Simulator::new(&small_config()).unwrap();
    let report = simulator.simulate(trace).unwrap();
    // 111 (cold fetch) + 12 (data miss, unified hit) + 1 (fetch hit)
    // + 112 (cold data access to the next block)
    assert_eq!(report.accesses, 4);
    assert_eq!(report.total_cycles, 236);
    assert_eq!(report.average_access_time, 59.0);
    assert_eq!(report.levels.instruction.references, 2);
    assert_eq!(report.levels.instruction.misses, 1);
    assert_eq!(report.levels.data.references, 2);
    assert_eq!(report.levels.data.misses, 2);
    assert_eq!(report.levels.unified.references, 3);
    assert_eq!(report.levels.unified.misses, 2);

    // Results accumulate across simulate calls
    let report = simulator.simulate(b"I 0x0").unwrap();
    assert_eq!(report.accesses, 5);
    assert_eq!(report.total_cycles, 237);
}

#[test]
fn report_survives_a_json_round_trip() {
    let mut simulator = Simulator::new(&small_config()).unwrap();
    let report = simulator.simulate(b"I 0x0\nD 0x8\nI 0x4").unwrap();
    let json = serde_json::to_string_pretty(&report).unwrap();
    let parsed: SimulationReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, report);
}

#[test]
fn malformed_trace_records_are_rejected_with_a_line_number() {
    let mut simulator = Simulator::new(&small_config()).unwrap();
    let err = simulator.simulate(b"I 0x0\nX 0x4").unwrap_err();
    assert!(err.contains("line 2"), "unexpected error: {err}");
    let err = simulator.simulate(b"I zz").unwrap_err();
    assert!(err.contains("line 1"), "unexpected error: {err}");
    let err = simulator.simulate(b"I").unwrap_err();
    assert!(err.contains("line 1"), "unexpected error: {err}");
}

#[test]
fn invalid_configuration_is_rejected_at_construction() {
    let mut config = small_config();
    config.instruction.sets = 6;
    assert!(CacheHierarchy::new(&config).is_err());
    assert!(Simulator::new(&config).is_err());
}
