// Edge cases for comment marker detection

// TODO: a normal marker
let x = 1; // todo: inline after code
/* HACK */
/*
 * TODO inside a block comment
 */
// hacker is not a marker
// mytodo is not a marker either
let todo = "TODO: not in a comment";
// (todo) and hack: both on one line
// todo: first todo: second only the first counts
// TODOS are not markers
