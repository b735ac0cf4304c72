// Platform integrations for third-party inference runtimes

pub mod pose;
