//! Domain types used throughout the SDK

pub mod device;
pub mod membership;
pub mod message;
pub mod object_model;
pub mod space;
pub mod webex_id;

pub use device::{ClusterCatalog, DeviceInfo, DeviceModel, RegionModel, ServiceHostMap};
pub use membership::{Membership, MembershipReadStatus};
pub use message::{ActivityModel, Message};
pub use object_model::{
    ContentModel, ConversationModel, FileModel, Items, ObjectBase, ObjectModel, PersonModel,
    RoomProperties, TeamModel,
};
pub use space::{Space, SpaceReadStatus, SpaceSortType, SpaceType};
pub use webex_id::{ResourceType, WebexId};
