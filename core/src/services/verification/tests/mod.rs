mod reaper_tests;
