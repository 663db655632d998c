#![doc = "Binary for building wasm files from the vault contracts."]
#![no_std]
#![no_main]
#![allow(unused_imports, clippy::single_component_path_imports)]
use toll_vault;
