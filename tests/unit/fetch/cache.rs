use hawk_loader::fetch::DownloadCache;
use hawk_loader::types::TestSeries;
use tempfile::TempDir;

#[test]
fn test_cache_dir_created_on_demand() {
    let tmp = TempDir::new().unwrap();
    let cache = DownloadCache::new(tmp.path().join("a/b/c"));
    assert!(!cache.dir().exists());
    cache.ensure_dir().unwrap();
    cache.ensure_dir().unwrap();
    assert!(cache.dir().is_dir());
}

#[test]
fn test_directory_is_not_a_cache_hit() {
    let tmp = TempDir::new().unwrap();
    let cache = DownloadCache::new(tmp.path());
    std::fs::create_dir(cache.path_for(TestSeries::Ni, "A_1_1")).unwrap();
    assert!(cache.lookup(TestSeries::Ni, "A_1_1").is_none());
    assert_eq!(cache.get_stats().misses, 1);
}
