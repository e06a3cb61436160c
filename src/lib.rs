// Public library interface for newsmap-layout
// This allows the debug CLI tool to use the core layout modules

pub mod layout;
