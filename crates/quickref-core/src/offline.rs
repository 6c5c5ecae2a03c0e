//! Bundled offline catalog of essential commands.
//!
//! A static category -> entries table usable without network access: the
//! zero-latency fallback when sources are slow or absent, and the backing
//! data for category browsing. Built once at startup into a read-only map.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::fuzzy::{fuzzy_score, is_fuzzy_match};
use crate::item::CheatSheetItem;

/// Fuzzy threshold for an entry to count as matching a search term.
const FUZZY_MATCH_THRESHOLD: u32 = 40;

/// Fixed score for entries returned by plain category browsing.
const CATEGORY_BROWSE_SCORE: u32 = 70;

/// Most results returned by an offline search.
const MAX_RESULTS: usize = 10;

/// One bundled (command, description) pair within a category.
#[derive(Debug, Clone, Copy)]
pub struct OfflineEntry {
    pub command: &'static str,
    pub description: &'static str,
    pub category: &'static str,
}

const SHEETS: &[(&str, &[(&str, &str)])] = &[
    ("git", &[
        ("git status", "Show the working tree status"),
        ("git add .", "Add all changes to staging"),
        ("git add [file]", "Add specific file to staging"),
        ("git commit -m \"message\"", "Commit staged changes with message"),
        ("git push", "Push commits to remote repository"),
        ("git pull", "Pull changes from remote repository"),
        ("git clone [url]", "Clone a repository"),
        ("git branch", "List all branches"),
        ("git branch [name]", "Create new branch"),
        ("git checkout [branch]", "Switch to branch"),
        ("git merge [branch]", "Merge branch into current"),
        ("git log", "Show commit history"),
        ("git diff", "Show changes"),
        ("git reset --hard HEAD", "Reset to last commit"),
        ("git stash", "Stash current changes"),
        ("git stash pop", "Apply stashed changes"),
        ("git rm [file]", "Remove specific file from staging"),
    ]),
    ("docker", &[
        ("docker ps", "List running containers"),
        ("docker ps -a", "List all containers"),
        ("docker run [image]", "Run a container"),
        ("docker run -it [image] bash", "Run container interactively"),
        ("docker stop [container]", "Stop container"),
        ("docker rm [container]", "Remove container"),
        ("docker rmi [image]", "Remove image"),
        ("docker build -t [name] .", "Build image from Dockerfile"),
        ("docker logs [container]", "Show container logs"),
        ("docker exec -it [container] bash", "Execute command in container"),
        ("docker pull [image]", "Pull image from registry"),
        ("docker push [image]", "Push image to registry"),
        ("docker images", "List images"),
        ("docker volume ls", "List volumes"),
        ("docker network ls", "List networks"),
    ]),
    ("kubectl", &[
        ("kubectl get pods", "List pods"),
        ("kubectl get services", "List services"),
        ("kubectl get deployments", "List deployments"),
        ("kubectl describe pod [name]", "Describe pod"),
        ("kubectl logs [pod]", "Show pod logs"),
        ("kubectl exec -it [pod] -- bash", "Execute command in pod"),
        ("kubectl apply -f [file]", "Apply configuration"),
        ("kubectl delete pod [name]", "Delete pod"),
        ("kubectl port-forward [pod] [port]:[port]", "Port forward"),
        ("kubectl get nodes", "List nodes"),
        ("kubectl top pods", "Show pod resource usage"),
        ("kubectl rollout restart deployment [name]", "Restart deployment"),
    ]),
    ("linux", &[
        ("ls -la", "List files with details"),
        ("cd [directory]", "Change directory"),
        ("pwd", "Show current directory"),
        ("mkdir [directory]", "Create directory"),
        ("rm [file]", "Remove file"),
        ("rm -rf [directory]", "Remove directory recursively"),
        ("cp [source] [dest]", "Copy file"),
        ("mv [source] [dest]", "Move/rename file"),
        ("find . -name \"[pattern]\"", "Find files by name"),
        ("grep \"[pattern]\" [file]", "Search in file"),
        ("ps aux", "List running processes"),
        ("kill [pid]", "Kill process by ID"),
        ("sudo [command]", "Run command as root"),
        ("chmod +x [file]", "Make file executable"),
        ("tar -xzf [file.tar.gz]", "Extract tar.gz file"),
        ("df -h", "Show disk usage"),
        ("free -h", "Show memory usage"),
    ]),
    ("npm", &[
        ("npm install", "Install dependencies"),
        ("npm install [package]", "Install package"),
        ("npm install -g [package]", "Install package globally"),
        ("npm run [script]", "Run npm script"),
        ("npm start", "Start application"),
        ("npm test", "Run tests"),
        ("npm build", "Build application"),
        ("npm list", "List installed packages"),
        ("npm outdated", "Check for outdated packages"),
        ("npm update", "Update packages"),
        ("npm uninstall [package]", "Uninstall package"),
        ("npm init", "Initialize new project"),
        ("npm publish", "Publish package"),
    ]),
    ("vim", &[
        ("i", "Enter insert mode"),
        ("Esc", "Exit insert mode"),
        (":w", "Save file"),
        (":q", "Quit vim"),
        (":wq", "Save and quit"),
        (":q!", "Quit without saving"),
        ("/[pattern]", "Search forward"),
        ("?[pattern]", "Search backward"),
        ("n", "Next search result"),
        ("N", "Previous search result"),
        ("dd", "Delete line"),
        ("yy", "Copy line"),
        ("p", "Paste"),
        ("u", "Undo"),
        ("Ctrl+r", "Redo"),
        ("gg", "Go to beginning"),
        ("G", "Go to end"),
    ]),
    ("python", &[
        ("python -m venv venv", "Create virtual environment"),
        ("source venv/bin/activate", "Activate virtual environment (Linux/Mac)"),
        ("venv\\Scripts\\activate", "Activate virtual environment (Windows)"),
        ("pip install [package]", "Install package"),
        ("pip install -r requirements.txt", "Install from requirements file"),
        ("pip freeze > requirements.txt", "Generate requirements file"),
        ("python -m pip list", "List installed packages"),
        ("python -c \"import [module]; print([module].__version__)\"", "Check module version"),
        ("python -m http.server 8000", "Start simple HTTP server"),
        ("python -m json.tool file.json", "Pretty print JSON"),
        ("python -m pdb script.py", "Debug script with pdb"),
        ("python -m pytest", "Run tests with pytest"),
    ]),
    ("javascript", &[
        ("node --version", "Check Node.js version"),
        ("npm init -y", "Initialize package.json"),
        ("npm install --save [package]", "Install and save to dependencies"),
        ("npm install --save-dev [package]", "Install and save to devDependencies"),
        ("npm run [script]", "Run npm script"),
        ("npx [command]", "Execute package binary"),
        ("console.log()", "Print to console"),
        ("JSON.stringify(obj, null, 2)", "Pretty print JSON"),
        ("Object.keys(obj)", "Get object keys"),
        ("Array.from({length: n}, (_, i) => i)", "Create array of numbers"),
        ("fetch('/api/data').then(r => r.json())", "Fetch API call"),
        ("setTimeout(() => {}, 1000)", "Set timeout"),
    ]),
    ("powershell", &[
        ("Get-Help [cmdlet]", "Get help for cmdlet"),
        ("Get-Command *[keyword]*", "Find commands"),
        ("Get-Process", "List running processes"),
        ("Get-Service", "List services"),
        ("Stop-Process -Name [name]", "Stop process by name"),
        ("Start-Service [name]", "Start service"),
        ("Get-ChildItem -Recurse", "List files recursively"),
        ("Test-Path [path]", "Check if path exists"),
        ("New-Item -ItemType Directory [name]", "Create directory"),
        ("Copy-Item [source] [dest]", "Copy file/folder"),
        ("Get-Content [file]", "Read file content"),
        ("Set-Content [file] [content]", "Write to file"),
        ("Invoke-WebRequest [url]", "Make HTTP request"),
        ("ConvertTo-Json [object]", "Convert to JSON"),
    ]),
    ("bash", &[
        ("echo $SHELL", "Show current shell"),
        ("which [command]", "Find command location"),
        ("history", "Show command history"),
        ("!!", "Repeat last command"),
        ("!n", "Repeat command number n"),
        ("alias ll='ls -la'", "Create alias"),
        ("export VAR=value", "Set environment variable"),
        ("echo $VAR", "Print environment variable"),
        ("for i in {1..10}; do echo $i; done", "For loop"),
        ("if [ -f file ]; then echo exists; fi", "If statement"),
        ("command1 && command2", "Run command2 if command1 succeeds"),
        ("command1 || command2", "Run command2 if command1 fails"),
        ("command > file.txt", "Redirect output to file"),
        ("command >> file.txt", "Append output to file"),
        ("command1 | command2", "Pipe output"),
    ]),
    ("sql", &[
        ("SELECT * FROM table", "Select all from table"),
        ("SELECT col1, col2 FROM table WHERE condition", "Select with condition"),
        ("INSERT INTO table (col1, col2) VALUES (val1, val2)", "Insert data"),
        ("UPDATE table SET col1 = val1 WHERE condition", "Update data"),
        ("DELETE FROM table WHERE condition", "Delete data"),
        ("CREATE TABLE table (id INT PRIMARY KEY, name VARCHAR(50))", "Create table"),
        ("ALTER TABLE table ADD COLUMN col_name datatype", "Add column"),
        ("DROP TABLE table", "Delete table"),
        ("SELECT COUNT(*) FROM table", "Count rows"),
        ("SELECT * FROM table ORDER BY col ASC/DESC", "Order results"),
        ("SELECT * FROM table LIMIT 10", "Limit results"),
        ("SELECT t1.*, t2.* FROM table1 t1 JOIN table2 t2 ON t1.id = t2.id", "Join tables"),
    ]),
    ("regex", &[
        (".", "Match any character"),
        ("*", "Match 0 or more"),
        ("+", "Match 1 or more"),
        ("?", "Match 0 or 1"),
        ("^", "Start of string"),
        ("$", "End of string"),
        ("\\d", "Match digit"),
        ("\\w", "Match word character"),
        ("\\s", "Match whitespace"),
        ("[abc]", "Match any of a, b, c"),
        ("[a-z]", "Match lowercase letter"),
        ("[0-9]", "Match digit"),
        ("(group)", "Capture group"),
        ("(?:group)", "Non-capturing group"),
        ("\\1", "Back reference to group 1"),
    ]),
    ("aws", &[
        ("aws configure", "Configure AWS CLI"),
        ("aws s3 ls", "List S3 buckets"),
        ("aws s3 cp file s3://bucket/", "Upload file to S3"),
        ("aws s3 sync . s3://bucket/", "Sync directory to S3"),
        ("aws ec2 describe-instances", "List EC2 instances"),
        ("aws ec2 start-instances --instance-ids i-1234567890abcdef0", "Start EC2 instance"),
        ("aws ec2 stop-instances --instance-ids i-1234567890abcdef0", "Stop EC2 instance"),
        ("aws lambda list-functions", "List Lambda functions"),
        ("aws logs describe-log-groups", "List CloudWatch log groups"),
        ("aws iam list-users", "List IAM users"),
        ("aws cloudformation list-stacks", "List CloudFormation stacks"),
        ("aws rds describe-db-instances", "List RDS instances"),
    ]),
    ("azure", &[
        ("az login", "Login to Azure"),
        ("az account list", "List subscriptions"),
        ("az account set --subscription [id]", "Set active subscription"),
        ("az group list", "List resource groups"),
        ("az vm list", "List virtual machines"),
        ("az vm start --name [name] --resource-group [rg]", "Start VM"),
        ("az vm stop --name [name] --resource-group [rg]", "Stop VM"),
        ("az storage account list", "List storage accounts"),
        ("az webapp list", "List web apps"),
        ("az functionapp list", "List function apps"),
        ("az keyvault list", "List key vaults"),
        ("az monitor log-analytics workspace list", "List Log Analytics workspaces"),
    ]),
    ("terraform", &[
        ("terraform init", "Initialize Terraform"),
        ("terraform plan", "Show execution plan"),
        ("terraform apply", "Apply changes"),
        ("terraform destroy", "Destroy infrastructure"),
        ("terraform validate", "Validate configuration"),
        ("terraform fmt", "Format configuration files"),
        ("terraform show", "Show current state"),
        ("terraform state list", "List resources in state"),
        ("terraform state show [resource]", "Show resource details"),
        ("terraform import [resource] [id]", "Import existing resource"),
        ("terraform workspace list", "List workspaces"),
        ("terraform workspace new [name]", "Create workspace"),
    ]),
    ("ansible", &[
        ("ansible-playbook playbook.yml", "Run playbook"),
        ("ansible-playbook playbook.yml --check", "Dry run playbook"),
        ("ansible-playbook playbook.yml --limit host", "Run on specific host"),
        ("ansible all -m ping", "Ping all hosts"),
        ("ansible all -m setup", "Gather facts"),
        ("ansible-inventory --list", "List inventory"),
        ("ansible-vault create secret.yml", "Create encrypted file"),
        ("ansible-vault edit secret.yml", "Edit encrypted file"),
        ("ansible-galaxy install role", "Install role"),
        ("ansible-config dump", "Show configuration"),
    ]),
    ("tmux", &[
        ("tmux new -s session", "Create named session"),
        ("tmux attach -t session", "Attach to session"),
        ("tmux list-sessions", "List sessions"),
        ("Ctrl+b d", "Detach from session"),
        ("Ctrl+b c", "Create new window"),
        ("Ctrl+b n", "Next window"),
        ("Ctrl+b p", "Previous window"),
        ("Ctrl+b %", "Split pane vertically"),
        ("Ctrl+b \"", "Split pane horizontally"),
        ("Ctrl+b arrow", "Switch pane"),
        ("Ctrl+b x", "Close pane"),
        ("Ctrl+b z", "Zoom pane"),
    ]),
];

static OFFLINE_SHEETS: LazyLock<BTreeMap<&'static str, Vec<OfflineEntry>>> = LazyLock::new(|| {
    SHEETS
        .iter()
        .map(|(category, entries)| {
            let built = entries
                .iter()
                .map(|(command, description)| OfflineEntry {
                    command,
                    description,
                    category,
                })
                .collect();
            (*category, built)
        })
        .collect()
});

/// Known category names, sorted.
pub fn categories() -> Vec<&'static str> {
    OFFLINE_SHEETS.keys().copied().collect()
}

/// Search the offline catalog.
///
/// A leading `"<category> "` prefix restricts matching to that category and
/// is stripped from the term before matching; otherwise all categories are
/// scanned and the category name itself also counts as a match target.
pub fn search(search_term: &str) -> Vec<CheatSheetItem> {
    let term = search_term.to_lowercase();
    let term = term.trim();
    if term.is_empty() {
        return Vec::new();
    }

    let mut category_prefix: Option<&str> = None;
    let mut command_term = term;

    for category in OFFLINE_SHEETS.keys() {
        if let Some(rest) = term.strip_prefix(&format!("{category} ")) {
            category_prefix = Some(category);
            command_term = rest.trim();
            break;
        }
    }

    let mut results = Vec::new();

    for (category, entries) in OFFLINE_SHEETS.iter() {
        if let Some(prefix) = category_prefix {
            if *category != prefix {
                continue;
            }
        }

        let search_in = if category_prefix.is_some() { command_term } else { term };

        for entry in entries {
            let command_lower = entry.command.to_lowercase();
            let matches = command_lower.contains(search_in)
                || entry.description.to_lowercase().contains(search_in)
                || (category_prefix.is_none() && category.contains(term))
                || is_fuzzy_match(search_in, entry.command, FUZZY_MATCH_THRESHOLD);
            if !matches {
                continue;
            }

            let mut score = offline_score(search_in, entry.command, entry.description);
            if category_prefix.is_some() {
                // Explicit category searches are more intentional
                score += 20;
            }

            results.push(to_item(entry, category, score));
        }
    }

    results.sort_by(|a, b| b.score.cmp(&a.score));
    results.truncate(MAX_RESULTS);
    results
}

/// All entries of one category with a fixed browse score, or empty when the
/// category is unknown.
pub fn get_by_category(category: &str) -> Vec<CheatSheetItem> {
    let key = category.to_lowercase();
    OFFLINE_SHEETS.get(key.as_str()).map_or_else(Vec::new, |entries| {
        entries
            .iter()
            .map(|entry| to_item(entry, &key, CATEGORY_BROWSE_SCORE))
            .collect()
    })
}

fn to_item(entry: &OfflineEntry, category: &str, score: u32) -> CheatSheetItem {
    CheatSheetItem {
        title: entry.command.to_string(),
        description: entry.description.to_string(),
        command: entry.command.to_string(),
        url: format!("offline://{category}"),
        source_name: format!("offline ({category})"),
        score,
    }
}

/// Base 60 plus exact/prefix/contains bonuses on the command, a description
/// bonus, and a scaled-down fuzzy component.
fn offline_score(search_term: &str, command: &str, description: &str) -> u32 {
    let mut score = 60;

    let command_lower = command.to_lowercase();
    let desc_lower = description.to_lowercase();

    if command_lower == search_term {
        score += 40;
    } else if command_lower.starts_with(search_term) {
        score += 30;
    } else if command_lower.contains(search_term) {
        score += 20;
    }

    if desc_lower.contains(search_term) {
        score += 10;
    }

    score += fuzzy_score(search_term, command) / 5;

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_all_bundled_categories() {
        let cats = categories();
        assert_eq!(cats.len(), 17);
        assert!(cats.contains(&"git"));
        assert!(cats.contains(&"tmux"));
    }

    #[test]
    fn category_prefix_restricts_and_strips() {
        let results = search("git commit");
        assert!(!results.is_empty());
        assert!(results.iter().all(|r| r.source_name == "offline (git)"));
        assert!(results.iter().any(|r| r.command.starts_with("git commit")));
    }

    #[test]
    fn git_rm_query_ranks_the_rm_entry_first() {
        let results = search("git rm");
        assert_eq!(results[0].command, "git rm [file]");
        assert_eq!(results[0].description, "Remove specific file from staging");
    }

    #[test]
    fn free_text_search_scans_all_categories() {
        let results = search("list running");
        let sources: Vec<&str> = results.iter().map(|r| r.source_name.as_str()).collect();
        // "List running containers" (docker) and "List running processes"
        // (linux, powershell) all match
        assert!(sources.iter().any(|s| s.contains("docker")));
        assert!(sources.iter().any(|s| s.contains("linux")));
    }

    #[test]
    fn results_sorted_and_capped_at_10() {
        let results = search("list");
        assert!(results.len() <= 10);
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn explicit_category_search_gets_score_boost() {
        let prefixed = search("docker ps");
        let bare = search("ps");
        let a = prefixed.iter().find(|r| r.command == "docker ps");
        let b = bare.iter().find(|r| r.command == "docker ps");
        if let (Some(a), Some(b)) = (a, b) {
            assert!(a.score > b.score);
        } else {
            assert!(a.is_some(), "prefixed search must find docker ps");
        }
    }

    #[test]
    fn browse_returns_whole_category_with_fixed_score() {
        let results = get_by_category("vim");
        assert_eq!(results.len(), 17);
        assert!(results.iter().all(|r| r.score == 70));
        assert!(results.iter().all(|r| r.url == "offline://vim"));
    }

    #[test]
    fn browse_is_case_insensitive_and_unknown_is_empty() {
        assert_eq!(get_by_category("GIT").len(), 17);
        assert!(get_by_category("cobol").is_empty());
    }

    #[test]
    fn blank_term_is_empty() {
        assert!(search("   ").is_empty());
    }

    #[test]
    fn offline_items_never_have_empty_commands() {
        for cat in categories() {
            for item in get_by_category(cat) {
                assert!(!item.command.is_empty());
                assert!(item.score >= 1);
            }
        }
    }
}
