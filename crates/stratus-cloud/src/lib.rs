#![doc = include_str!("../readme.md")]

pub mod broker;
pub mod cloudlet;
pub mod cloudlet_scheduler;
pub mod cloudlet_schedulers;
pub mod config;
pub mod datacenter;
pub mod events;
pub mod execution;
pub mod host;
pub mod processor;
pub mod resource;
pub mod tags;
pub mod utilization;
pub mod vm;
pub mod vm_allocation;
pub mod vm_allocation_policies;
