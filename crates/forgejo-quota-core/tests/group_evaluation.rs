// Integration tests for quota groups, group lists and the default policy

use forgejo_quota_core::{
    DefaultQuota, Group, GroupList, LimitSubject, Rule, Used, Verdict, evaluate_default,
};

fn unlimited_rule() -> Rule {
    Rule::unlimited("unlimited", [LimitSubject::SizeAll])
}

fn deny_rule() -> Rule {
    Rule::new("deny", 0, [LimitSubject::SizeAll]).unwrap()
}

fn used_public(bytes: i64) -> Used {
    let mut used = Used::default();
    used.size.repos.public = bytes;
    used
}

#[test]
fn test_group_all_rules_must_allow() {
    let group = Group::with_rules("layered", vec![unlimited_rule(), deny_rule()]);

    // The deny rule wins even though an unlimited rule matched first
    assert_eq!(
        group.evaluate(&used_public(1024), LimitSubject::SizeAll),
        Verdict::DENY
    );
}

#[test]
fn test_group_rule_scenario() {
    let group = Group::with_rules(
        "scenario",
        vec![
            Rule::new(
                "pooled",
                1024,
                [
                    LimitSubject::SizeAssetsAttachmentsReleases,
                    LimitSubject::SizeGitLfs,
                    LimitSubject::SizeAssetsPackagesAll,
                ],
            )
            .unwrap(),
            Rule::new("no-lfs", 0, [LimitSubject::SizeGitLfs]).unwrap(),
        ],
    );

    let mut used = Used::default();
    used.size.assets.attachments.releases = 512;
    used.size.assets.packages.all = 256;
    used.size.git.lfs = 16;

    assert_eq!(
        group.evaluate(&used, LimitSubject::SizeAssetsAttachmentsReleases),
        Verdict::ALLOW
    );
    assert_eq!(
        group.evaluate(&used, LimitSubject::SizeAssetsPackagesAll),
        Verdict::ALLOW
    );
    assert_eq!(group.evaluate(&used, LimitSubject::SizeGitLfs), Verdict::DENY);
    assert_eq!(group.evaluate(&used, LimitSubject::SizeAll), Verdict::NO_MATCH);
}

#[test]
fn test_group_rule_combination() {
    let group = Group::with_rules(
        "combination",
        vec![
            Rule::new("repos", 4096, [LimitSubject::SizeReposAll]).unwrap(),
            Rule::new("packages", 0, [LimitSubject::SizeAssetsPackagesAll]).unwrap(),
        ],
    );

    let mut used = used_public(1024);
    used.size.assets.packages.all = 1024;

    assert_eq!(group.evaluate(&used, LimitSubject::SizeGitLfs), Verdict::NO_MATCH);
    assert_eq!(group.evaluate(&used, LimitSubject::SizeReposAll), Verdict::ALLOW);
    assert_eq!(
        group.evaluate(&used, LimitSubject::SizeAssetsPackagesAll),
        Verdict::DENY
    );
}

#[test]
fn test_group_list_requires_only_one_allow() {
    let groups = GroupList::from(vec![
        Group::with_rules("deny", vec![deny_rule()]),
        Group::with_rules("unlimited", vec![unlimited_rule()]),
    ]);

    assert!(groups.evaluate(
        &used_public(1024),
        LimitSubject::SizeAll,
        &DefaultQuota::default()
    ));
}

#[test]
fn test_group_list_all_deny() {
    let groups = GroupList::from(vec![
        Group::with_rules("deny", vec![deny_rule()]),
        Group::with_rules(
            "limited",
            vec![Rule::new("1k", 1024, [LimitSubject::SizeAll]).unwrap()],
        ),
    ]);

    assert!(!groups.evaluate(
        &used_public(2048),
        LimitSubject::SizeAll,
        &DefaultQuota::default()
    ));
}

#[test]
fn test_empty_group_list_uses_default() {
    let groups = GroupList::new();
    let used = used_public(2048);

    for (total, expect_allow) in [(-1, true), (1024 * 1024, true), (1024, false)] {
        let defaults = DefaultQuota::new(total);
        for subject in LimitSubject::iter() {
            assert_eq!(
                groups.evaluate(&used, subject, &defaults),
                expect_allow,
                "{subject} total {total}"
            );
            assert_eq!(
                groups.evaluate(&used, subject, &defaults),
                evaluate_default(&used, subject, &defaults)
            );
        }
    }
}

#[test]
fn test_evaluation_is_repeatable() {
    let groups = GroupList::from(vec![Group::with_rules(
        "limited",
        vec![Rule::new("1k", 1024, [LimitSubject::SizeReposAll]).unwrap()],
    )]);
    let used = used_public(512);
    let defaults = DefaultQuota::default();

    let first = groups.evaluate(&used, LimitSubject::SizeReposPublic, &defaults);
    let second = groups.evaluate(&used, LimitSubject::SizeReposPublic, &defaults);
    assert!(first);
    assert_eq!(first, second);
}

#[test]
fn test_evaluation_across_threads() {
    let groups = std::sync::Arc::new(GroupList::from(vec![Group::with_rules(
        "limited",
        vec![Rule::new("4k", 4096, [LimitSubject::SizeAll]).unwrap()],
    )]));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let groups = groups.clone();
            std::thread::spawn(move || {
                let used = used_public(i * 2048);
                groups.evaluate(&used, LimitSubject::SizeAll, &DefaultQuota::default())
            })
        })
        .collect();

    let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec![true, true, false, false]);
}
