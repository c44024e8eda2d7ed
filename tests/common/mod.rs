use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Isolated environment for CLI tests: a private HOME with a generated
/// config file and a stub racadm executable that replays canned transcripts.
pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    fixtures: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        let fixtures = tmp.path().join("fixtures");
        fs::create_dir_all(&home).expect("create isolated home");
        fs::create_dir_all(&fixtures).expect("create fixtures dir");

        let racadm = write_stub_racadm(tmp.path(), &fixtures);

        let config_dir = home.join(".config/dractl");
        fs::create_dir_all(&config_dir).expect("create config dir");
        fs::write(
            config_dir.join("config.toml"),
            format!(
                "endpoint = \"idrac-test\"\n\
                 user = \"root\"\n\
                 password = \"calvin\"\n\
                 racadm_bin = \"{}\"\n\
                 retries = 1\n\
                 probe = false\n",
                racadm.display()
            ),
        )
        .expect("write config");

        Self {
            _tmp: tmp,
            home,
            fixtures,
        }
    }

    /// Register the stub's reply for one racadm command (without the
    /// connection arguments).
    pub fn transcript(&self, command: &str, output: &str) {
        fs::write(self.fixtures.join(sanitize(command)), output).expect("write transcript");
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("dractl").expect("binary built");
        cmd.env("HOME", &self.home)
            .env_remove("DRACTL_ENDPOINT")
            .env_remove("DRACTL_USER")
            .env_remove("DRACTL_PASSWORD");
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }
}

/// Mirror of the stub's key mangling: everything outside [A-Za-z0-9._-]
/// becomes an underscore.
fn sanitize(command: &str) -> String {
    command
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn write_stub_racadm(base: &std::path::Path, fixtures: &std::path::Path) -> PathBuf {
    let bin_dir = base.join("bin");
    fs::create_dir_all(&bin_dir).expect("create stub bin dir");
    let path = bin_dir.join("racadm");
    let script = format!(
        "#!/bin/sh\n\
         # fake racadm: replays transcripts registered by the test-suite\n\
         FIXTURES=\"{}\"\n\
         while [ \"$#\" -gt 0 ]; do\n\
             case \"$1\" in\n\
                 -r|-u|-p) shift 2 ;;\n\
                 *) break ;;\n\
             esac\n\
         done\n\
         key=$(printf '%s' \"$*\" | tr -c 'A-Za-z0-9._-' '_')\n\
         if [ -f \"$FIXTURES/$key\" ]; then\n\
             cat \"$FIXTURES/$key\"\n\
         else\n\
             printf 'ERROR: TEST001 : no transcript for: %s\\n' \"$*\"\n\
         fi\n",
        fixtures.display()
    );
    fs::write(&path, script).expect("write stub racadm");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod stub");
    }
    path
}

pub const HWINVENTORY: &str = "\
[InstanceID: System.Embedded.1]
Device Type = System
Model = PowerEdge R640
ChassisSystemHeight = 1U
ServiceTag = ABC1234
HostName = db01.example.net
PopulatedCPUSockets = 2
MaxCPUSockets = 2
PopulatedDIMMSlots = 8
MaxDIMMSlots = 24
SysMemTotalSize = 128 GB
SysMemMaxCapacitySize = 3072 GB

[InstanceID: CPU.Socket.1]
Device Type = CPU
DeviceDescription = CPU 1
Model = Intel(R) Xeon(R) Silver 4110
NumberOfEnabledCores = 8
NumberOfEnabledThreads = 16

[InstanceID: PSU.Slot.1]
Device Type = PowerSupply
DeviceDescription = Power Supply 1

[InstanceID: PSU.Slot.2]
Device Type = PowerSupply
DeviceDescription = Power Supply 2
";

pub const IPV4_REGISTRY: &str = "\
[Key=iDRAC.Embedded.1#IPv4.1]
Address=10.0.0.42
DHCPEnable=Enabled
Gateway=10.0.0.1
Netmask=255.255.255.0
#Enable=Enabled
";

pub const SEL_LOG: &str = "\
2024/05/12 09:14:02 SEL Critical Fan 3 RPM is lower than threshold
2024/05/12 09:20:17 SEL Ok Fan 3 RPM is within range
2024/05/13 11:02:44 SEL Warning Power supply redundancy is degraded
";

pub const PDISKS: &str = "\
Disk.Bay.0:Enclosure.Internal.0-1:RAID.Integrated.1-1
   Name       = Solid State Disk 0:1:0
   State      = Online
   Status     = Ok
   MediaType  = SSD
   Size       = 223.00 GB
Disk.Bay.1:Enclosure.Internal.0-1:RAID.Integrated.1-1
   Name       = Solid State Disk 0:1:1
   State      = Online
   Status     = Ok
   MediaType  = SSD
   Size       = 229.25 GB
Disk.Bay.2:Enclosure.Internal.0-1:RAID.Integrated.1-1
   Name       = Physical Disk 0:1:2
   State      = Online
   Status     = Ok
   MediaType  = HDD
   Size       = 1863.00 GB
";

pub const JOB_VIEW: &str = "\
---------------------------- JOB -------------------------
[Job ID=JID_378288740486]
Job Name=Configure: RAID.Integrated.1-1
Status=Completed
Start Time=[Now]
Expiration Time=[Not Applicable]
Message=[PR19: Job completed successfully.]
Percent Complete=[100]
----------------------------------------------------------
";
