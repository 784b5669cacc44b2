use std::rc::Rc;

use sugars::{rc, refcell};

use stratus_core::entity::SimEntity;
use stratus_core::event::Event;
use stratus_core::simulation::Simulation;
use stratus_core::Id;

use stratus_cloud::broker::DatacenterBroker;
use stratus_cloud::cloudlet::Cloudlet;
use stratus_cloud::cloudlet_schedulers::TimeSharedScheduler;
use stratus_cloud::config::CloudConfig;
use stratus_cloud::datacenter::Datacenter;
use stratus_cloud::events::cloudlet::CloudletControl;
use stratus_cloud::host::Host;
use stratus_cloud::tags;
use stratus_cloud::vm::Vm;
use stratus_cloud::vm_allocation_policies::FirstFit;

fn default_config() -> Rc<CloudConfig> {
    rc!(CloudConfig::new())
}

fn time_shared_vm(id: u32, pes: u32) -> Vm {
    Vm::new(id, 1000., pes, 1024, 100, Box::new(TimeSharedScheduler::new()))
}

#[test]
// Two 1-PE cloudlets on a 2-PE VM run at 1000 MIPS each: the 500 MI one
// returns at t=0.5, the 1000 MI one at t=1.0, then the broker tears the VM
// down and the simulation ends.
fn test_end_to_end_run() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut sim = Simulation::new();

    let host = Host::new(0, 4, 1000., 8192, 1000);
    let datacenter = rc!(refcell!(Datacenter::new(
        "dc",
        vec![host],
        Box::new(FirstFit::new()),
        default_config(),
    )));
    sim.add_entity(datacenter.clone());

    let mut broker = DatacenterBroker::new("broker", default_config());
    broker.submit_vm(time_shared_vm(1, 2));
    broker.submit_cloudlet(Cloudlet::new(1, 1000, 1).with_vm(1));
    broker.submit_cloudlet(Cloudlet::new(2, 500, 1).with_vm(1));
    let broker = rc!(refcell!(broker));
    sim.add_entity(broker.clone());

    let last = sim.start().unwrap();
    assert_eq!(last, 1.0);

    let broker = broker.borrow();
    assert!(broker.failed_cloudlets().is_empty());
    let finished: Vec<u32> = broker.finished_cloudlets().iter().map(|c| c.id()).collect();
    assert_eq!(finished, vec![2, 1]);

    // The VM was destroyed and its resources released.
    let datacenter = datacenter.borrow();
    assert!(datacenter.vm(1).is_none());
    assert_eq!(datacenter.hosts()[0].pes().available(), 4);
    assert_eq!(datacenter.hosts()[0].ram().allocated(), 0);
}

#[test]
// Message and VM start delays shift the whole timeline: the VM ack arrives
// at t=1.0, the 500 MI cloudlet is submitted at t=1.25 and completes 0.5
// seconds later, returning at t=2.0; the final VM teardown lands at t=2.25.
fn test_delays_shift_the_timeline() {
    let mut sim = Simulation::new();
    let config = rc!(CloudConfig {
        message_delay: 0.25,
        storage_bandwidth_mbps: 100.,
        vm_start_delay: 0.5,
        scheduling_interval: 0.,
    });

    let host = Host::new(0, 2, 1000., 4096, 1000);
    let datacenter = rc!(refcell!(Datacenter::new(
        "dc",
        vec![host],
        Box::new(FirstFit::new()),
        config.clone(),
    )));
    sim.add_entity(datacenter);

    let mut broker = DatacenterBroker::new("broker", config);
    broker.submit_vm(time_shared_vm(1, 1));
    broker.submit_cloudlet(Cloudlet::new(1, 500, 1).with_vm(1));
    let broker = rc!(refcell!(broker));
    sim.add_entity(broker.clone());

    let last = sim.start().unwrap();
    assert_eq!(last, 2.25);
    assert_eq!(broker.borrow().finished_cloudlets().len(), 1);
}

#[test]
// A VM that fits no host is rejected; its cloudlets fail without running.
fn test_vm_allocation_failure() {
    let mut sim = Simulation::new();

    let host = Host::new(0, 1, 1000., 4096, 1000);
    let datacenter = rc!(refcell!(Datacenter::new(
        "dc",
        vec![host],
        Box::new(FirstFit::new()),
        default_config(),
    )));
    sim.add_entity(datacenter);

    let mut broker = DatacenterBroker::new("broker", default_config());
    broker.submit_vm(time_shared_vm(1, 2));
    broker.submit_cloudlet(Cloudlet::new(1, 1000, 1).with_vm(1));
    let broker = rc!(refcell!(broker));
    sim.add_entity(broker.clone());

    let last = sim.start().unwrap();
    assert_eq!(last, 0.);
    assert!(broker.borrow().finished_cloudlets().is_empty());
    assert_eq!(broker.borrow().failed_cloudlets().len(), 1);
}

#[test]
// VMs are distributed round-robin across the registered datacenters.
fn test_round_robin_across_datacenters() {
    let mut sim = Simulation::new();

    let dc1 = rc!(refcell!(Datacenter::new(
        "dc1",
        vec![Host::new(0, 2, 1000., 4096, 1000)],
        Box::new(FirstFit::new()),
        default_config(),
    )));
    sim.add_entity(dc1.clone());
    let dc2 = rc!(refcell!(Datacenter::new(
        "dc2",
        vec![Host::new(0, 2, 1000., 4096, 1000)],
        Box::new(FirstFit::new()),
        default_config(),
    )));
    sim.add_entity(dc2.clone());

    let mut broker = DatacenterBroker::new("broker", default_config());
    broker.submit_vm(time_shared_vm(1, 1));
    broker.submit_vm(time_shared_vm(2, 1));
    broker.submit_cloudlet(Cloudlet::new(1, 500, 1).with_vm(1));
    broker.submit_cloudlet(Cloudlet::new(2, 500, 1).with_vm(2));
    let broker = rc!(refcell!(broker));
    sim.add_entity(broker.clone());

    // Inspect placement before the broker tears the VMs down.
    let dc1_probe = dc1.clone();
    let dc2_probe = dc2.clone();
    let placements = rc!(refcell!(Vec::new()));
    let placements_probe = placements.clone();
    sim.add_on_clock_tick_listener(move |info| {
        if info.time == 0. {
            placements_probe.borrow_mut().push((
                dc1_probe.borrow().vm(1).is_some(),
                dc1_probe.borrow().vm(2).is_some(),
                dc2_probe.borrow().vm(2).is_some(),
            ));
        }
    });

    sim.start().unwrap();
    assert_eq!(broker.borrow().finished_cloudlets().len(), 2);
    assert_eq!(*placements.borrow(), vec![(true, false, true)]);
}

#[test]
// Canceling a running cloudlet mid-flight returns it to the broker as
// canceled while the other cloudlet completes normally.
fn test_cancel_through_datacenter() {
    struct Canceler {
        datacenter: Id,
    }
    impl SimEntity for Canceler {
        fn name(&self) -> &str {
            "canceler"
        }
        fn start(&mut self, sim: &mut Simulation, id: Id) {
            sim.send(
                id,
                self.datacenter,
                0.2,
                tags::CLOUDLET_CANCEL,
                CloudletControl {
                    cloudlet_id: 2,
                    vm_id: 1,
                },
            )
            .unwrap();
        }
        fn process_event(&mut self, _sim: &mut Simulation, _id: Id, _event: Event) {}
    }

    let mut sim = Simulation::new();
    let datacenter = rc!(refcell!(Datacenter::new(
        "dc",
        vec![Host::new(0, 2, 1000., 4096, 1000)],
        Box::new(FirstFit::new()),
        default_config(),
    )));
    let datacenter_id = sim.add_entity(datacenter);

    let mut broker = DatacenterBroker::new("broker", default_config());
    broker.submit_vm(time_shared_vm(1, 2));
    broker.submit_cloudlet(Cloudlet::new(1, 1000, 1).with_vm(1));
    broker.submit_cloudlet(Cloudlet::new(2, 500, 1).with_vm(1));
    let broker = rc!(refcell!(broker));
    sim.add_entity(broker.clone());
    sim.add_entity(rc!(refcell!(Canceler {
        datacenter: datacenter_id
    })));

    let last = sim.start().unwrap();
    assert!((last - 1.0).abs() < 1e-9);

    let broker = broker.borrow();
    let finished: Vec<u32> = broker.finished_cloudlets().iter().map(|c| c.id()).collect();
    let failed: Vec<u32> = broker.failed_cloudlets().iter().map(|c| c.id()).collect();
    assert_eq!(finished, vec![1]);
    assert_eq!(failed, vec![2]);
}

#[test]
// Config values are read from YAML with defaults for absent parameters.
fn test_config_from_file() {
    let path = std::env::temp_dir().join("stratus_cloud_test_config.yaml");
    std::fs::write(&path, "message_delay: 0.2\nvm_start_delay: 1.0\n").unwrap();
    let config = CloudConfig::from_file(path.to_str().unwrap());
    assert_eq!(config.message_delay, 0.2);
    assert_eq!(config.vm_start_delay, 1.0);
    assert_eq!(config.storage_bandwidth_mbps, 100.);
    assert_eq!(config.scheduling_interval, 0.);
}
