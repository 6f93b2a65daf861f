mod formatter_tests;
