pub mod coinfalcon;
