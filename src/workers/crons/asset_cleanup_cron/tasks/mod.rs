pub mod cleanup_orphaned_logos;
