// Messaging - Events out of the sequencer, commands into the session

pub mod channels;
pub mod command;
pub mod event;
pub mod view;

pub use channels::{
    CommandConsumer, CommandProducer, EventConsumer, EventProducer, create_command_channel,
    create_event_channel, drain_events,
};
pub use command::Command;
pub use event::{SequencerEvent, StepDisplay};
pub use view::{ChannelView, NullView, View};
