//=========================================================================
// Screen Stack System
//=========================================================================
//
// Manages screen configuration, the visibility stack, and the
// show/hide protocol.
//
// Architecture:
//   ScreenManager
//     ├─ lookup: HashMap<K, Rc<dyn Screen>>   (valid screens)
//     ├─ stack:  Vec<K>                       (index 0 = topmost)
//     └─ hooks:  cached listener tokens per event channel
//
// Flow:
//   ScreenKey::request_show() → ScreenManager::show_screen()
//     → Screen::show() → show_started / show_completed hooks
//
//=========================================================================

//=== Module Declarations =================================================

mod screen_manager;

//=== Public API ==========================================================

pub use screen_manager::{ScreenBinding, ScreenManager, ScreenManagerConfig};

pub(crate) use screen_manager::ManagerCore;
